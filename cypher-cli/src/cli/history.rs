// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Line editor with persisted history
//!
//! [`HistoryGuard`] loads the history file when it is opened and writes it
//! back when dropped, so every return path out of the shell saves it.

use std::ffi::OsString;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;

use log::{debug, warn};
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, EditMode, Editor};

use super::completion::KeywordCompleter;

/// History file name, relative to the home directory
pub const HISTORY_FILE: &str = ".neo4j-client.history";

pub type ShellEditor = Editor<KeywordCompleter, DefaultHistory>;

/// `~/.neo4j-client.history`, or `None` without a home directory
pub fn history_path() -> Option<PathBuf> {
    history_path_in(std::env::var_os("HOME"))
}

fn history_path_in(home: Option<OsString>) -> Option<PathBuf> {
    home.filter(|h| !h.is_empty())
        .map(|h| PathBuf::from(h).join(HISTORY_FILE))
}

pub struct HistoryGuard {
    editor: ShellEditor,
    path: Option<PathBuf>,
}

impl HistoryGuard {
    /// Build the editor and load history from `path` if it exists.
    pub fn open(path: Option<PathBuf>) -> rustyline::Result<Self> {
        let config = Config::builder()
            .edit_mode(EditMode::Vi)
            .history_ignore_space(true)
            .completion_type(CompletionType::List)
            .auto_add_history(false)
            .build();

        let mut editor = ShellEditor::with_config(config)?;
        editor.set_helper(Some(KeywordCompleter::default()));

        if let Some(path) = path.as_ref().filter(|p| p.exists()) {
            match editor.load_history(path) {
                Ok(()) => debug!("loaded history from {}", path.display()),
                Err(e) => warn!("could not read history {}: {}", path.display(), e),
            }
        }

        Ok(Self { editor, path })
    }
}

impl Deref for HistoryGuard {
    type Target = ShellEditor;

    fn deref(&self) -> &ShellEditor {
        &self.editor
    }
}

impl DerefMut for HistoryGuard {
    fn deref_mut(&mut self) -> &mut ShellEditor {
        &mut self.editor
    }
}

impl Drop for HistoryGuard {
    fn drop(&mut self) {
        if let Some(path) = &self.path {
            if let Err(e) = self.editor.save_history(path) {
                warn!("could not save history {}: {}", path.display(), e);
            }
        }
    }
}
