//! # Feedback Subsystem
//!
//! **Subsystem ID:** 4
//!
//! Reviews and reports, each attachable once to a claim. Attachments are
//! uploaded one by one through a [`MediaUploader`]; a failed upload is
//! skipped and the submission goes ahead with the rest.
//!
//! | Kind | Claim state | Attachments field | Encoding |
//! |------|-------------|-------------------|----------|
//! | Review | completed | `reviewMedia` | JSON array |
//! | Report | any | `evidence` | absent / bare URL / JSON array string |

pub mod domain;
pub mod ports;
pub mod service;
pub mod uploads;

pub use domain::*;
pub use ports::*;
pub use service::{FeedbackReceipt, FeedbackService};
pub use uploads::{upload_all, UploadReport};
