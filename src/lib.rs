//! skr-client - submit jobs to the NLM SKR/MTI scheduler
//!
//! The scheduler runs text-processing programs (MetaMap, SemRep, MTI and
//! generic batch commands) on behalf of UTS account holders. A job is a
//! multipart form posted with a CAS service ticket.
//!
//! ```no_run
//! use skr_client::auth::ApiKeyCredentials;
//! use skr_client::config::ClientConfig;
//! use skr_client::form::{FormState, fields};
//! use skr_client::submit::SubmissionClient;
//! use skr_client::types::{RunProg, ServiceTarget};
//!
//! # async fn run() -> skr_client::error::Result<()> {
//! let config = ClientConfig::from_env()?;
//! let credentials = ApiKeyCredentials::new("my-uts-api-key");
//! let mut client =
//!     SubmissionClient::connect(config, ServiceTarget::BatchValidation, &credentials).await?;
//!
//! let mut form = FormState::new(RunProg::GenericValidated);
//! form.set_text(fields::EMAIL_ADDRESS, "me@example.org")
//!     .set_text(fields::BATCH_COMMAND, "metamap -% format -E")
//!     .set_file(fields::UPLOAD_FILE, "sample.txt");
//!
//! let result = client.submit(&form).await?;
//! print!("{result}");
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod form;
pub mod submit;
pub mod ticket;
pub mod types;
pub mod validate;

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use form::{ContentSource, FormState};
pub use submit::SubmissionClient;
