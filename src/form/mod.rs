//! Job request form
//!
//! A [`FormState`] is the set of named fields posted to the scheduler for
//! one job. Field names are free-form; the ones the scheduler recognizes
//! are listed in [`fields`].

mod content;
pub mod multipart;

pub use content::{ContentSource, DEFAULT_MEDIA_TYPE, SourceKind};
pub use multipart::{EncodedForm, encode};

use crate::types::RunProg;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Field names understood by the scheduler
pub mod fields {
    /// Submitter's email address (required)
    pub const EMAIL_ADDRESS: &str = "Email_Address";
    /// Batch input file
    pub const UPLOAD_FILE: &str = "UpLoad_File";
    /// Interactive input text
    pub const API_TEXT: &str = "APIText";
    /// Command the batch job runs
    pub const BATCH_COMMAND: &str = "Batch_Command";
    /// `#`-separated environment for the batch command
    pub const BATCH_ENV: &str = "Batch_Env";
    /// Free-form notes attached to the job
    pub const BATCH_NOTES: &str = "BatchNotes";
    /// Suppress the completion email
    pub const SILENT_EMAIL: &str = "silentEmail";
    /// Extra arguments for interactive programs
    pub const COMMAND_ARGS: &str = "COMMAND_ARGS";
    /// Job variant marker
    pub const RUN_PROG: &str = "RUN_PROG";
    /// Marks the request as coming from the API client
    pub const SKR_API: &str = "SKR_API";
}

/// Default `Batch_Command` marker
pub const DEFAULT_BATCH_COMMAND: &str = "skr";

/// Ordered, name-keyed fields of one job request
///
/// Setting an existing name replaces its value in place, so the order in
/// which names were first set is kept for encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    entries: Vec<(String, ContentSource)>,
    run_prog: RunProg,
}

impl FormState {
    /// Create a form with bookkeeping fields and the given job variant
    pub fn new(run_prog: RunProg) -> Self {
        let mut form = Self {
            entries: Vec::new(),
            run_prog,
        };
        form.put(fields::RUN_PROG, ContentSource::text(run_prog.as_str()));
        form.put(fields::SKR_API, ContentSource::text("true"));
        form.put(
            fields::BATCH_COMMAND,
            ContentSource::text(DEFAULT_BATCH_COMMAND),
        );
        form.put(fields::BATCH_ENV, ContentSource::text(""));
        form
    }

    /// Job variant fixed at construction
    pub const fn run_prog(&self) -> RunProg {
        self.run_prog
    }

    /// Set a text field
    pub fn set_text(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.set(name, ContentSource::text(value))
    }

    /// Set a boolean field, stored as `"true"` or `"false"`
    pub fn set_bool(&mut self, name: &str, flag: bool) -> &mut Self {
        self.set(name, ContentSource::text(flag.to_string()))
    }

    /// Attach a file; its contents are read when the form is encoded
    pub fn set_file(&mut self, name: &str, path: impl Into<PathBuf>) -> &mut Self {
        self.set(name, ContentSource::file(path))
    }

    /// Attach in-memory content as an uploaded file named `virtual_name`
    pub fn set_file_from_buffer(
        &mut self,
        name: &str,
        virtual_name: &str,
        bytes: impl Into<Vec<u8>>,
    ) -> &mut Self {
        self.set(name, ContentSource::buffer(virtual_name, bytes))
    }

    /// Set a field to an arbitrary source
    ///
    /// `RUN_PROG` is owned by the form and cannot be overwritten.
    pub fn set(&mut self, name: &str, source: ContentSource) -> &mut Self {
        if name == fields::RUN_PROG {
            warn!(
                run_prog = self.run_prog.as_str(),
                "RUN_PROG is fixed when the form is created; ignoring update"
            );
            return self;
        }
        self.put(name, source);
        self
    }

    fn put(&mut self, name: &str, source: ContentSource) {
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| n == name) {
            debug!(field = name, "replacing form field");
            slot.1 = source;
        } else {
            debug!(field = name, "adding form field");
            self.entries.push((name.to_string(), source));
        }
    }

    /// Value of a field
    pub fn get(&self, name: &str) -> Option<&ContentSource> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, source)| source)
    }

    /// Whether a field is set
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of fields, bookkeeping included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: bookkeeping fields are present from construction
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fields in encoding order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContentSource)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s))
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(RunProg::default())
    }
}
