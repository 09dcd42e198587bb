pub mod config;
pub mod error;
pub mod listgen;
pub mod submit;
pub mod worker;

pub use config::{IniDocument, RfAceConfig, DEFAULT_CONFIG_PATH};
pub use error::GenError;
pub use listgen::{generate, ListGenOptions, ListGenResult};
pub use submit::{CommandRunner, ShellRunner};
pub use worker::{run_sample_job, InvocationIds};
