//! Copyright header validation.
//!
//! A header is accepted when the first substantive line of the file is
//! `<marker> Copyright 20XX <Organization>` and the following lines are the
//! license body, each prefixed with the same marker. The marker is whatever
//! comment token opened the header (`#`, `//` or ` *`), so one template
//! covers shell/Python, C/C++ and block-comment styles.

use crate::core::check::{Check, CheckContext};
use crate::core::error::{CheckFailure, PresubmitError};
use crate::core::filter::FilterSpec;
use crate::core::output::plural;
use regex::Regex;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

pub const CHECK_NAME: &str = "copyright_notice";

/// License body following the copyright line, without comment markers.
pub const LICENSE_BODY: &[&str] = &[
    "",
    " Licensed under the Apache License, Version 2.0 (the \"License\"); you may not",
    " use this file except in compliance with the License. You may obtain a copy of",
    " the License at",
    "",
    "     https://www.apache.org/licenses/LICENSE-2.0",
    "",
    " Unless required by applicable law or agreed to in writing, software",
    " distributed under the License is distributed on an \"AS IS\" BASIS, WITHOUT",
    " WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the",
    " License for the specific language governing permissions and limitations under",
    " the License.",
];

/// Paths that never carry a header.
pub const EXCLUDE_FROM_COPYRIGHT_NOTICE: &[&str] = &[
    r"(?:.+/)?\..+",
    r"AUTHORS",
    r"LICENSE",
    r".*\.md",
    r".*\.rst",
    r"(?:.+/)?requirements\.txt",
    r"(?:.+/)?go\.(?:mod|sum)",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderVerdict {
    Valid,
    /// No recognizable copyright line where the header should start.
    MissingFirstLine,
    /// 1-based line number of the first body line that differs.
    BodyMismatch { line: usize },
    /// File ended before the license body was complete.
    Truncated,
}

#[derive(Debug, Clone)]
pub struct CopyrightValidator {
    first_line: Regex,
    body: Vec<String>,
}

impl CopyrightValidator {
    pub fn new(organization: &str) -> Result<Self, PresubmitError> {
        Self::with_body(organization, LICENSE_BODY)
    }

    pub fn with_body<S: AsRef<str>>(organization: &str, body: &[S]) -> Result<Self, PresubmitError> {
        let pattern = format!(
            r"^(#|//| \*) Copyright 20\d\d {}$",
            regex::escape(organization)
        );
        let first_line = Regex::new(&pattern)
            .map_err(|e| PresubmitError::ConfigError(format!("copyright pattern: {}", e)))?;
        Ok(Self {
            first_line,
            body: body.iter().map(|l| l.as_ref().to_string()).collect(),
        })
    }

    pub fn validate(&self, contents: &str) -> HeaderVerdict {
        // Only `\n` is a terminator; a stray `\r` makes the line mismatch.
        let lines = contents
            .split_inclusive('\n')
            .map(|l| Ok(l.strip_suffix('\n').unwrap_or(l).to_string()));
        self.verdict(lines).unwrap_or(HeaderVerdict::MissingFirstLine)
    }

    /// Reads no further than the end of the license body.
    pub fn validate_file(&self, path: &Path) -> Result<HeaderVerdict, PresubmitError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(self.verdict(RawLines(reader))?)
    }

    fn verdict<I>(&self, lines: I) -> io::Result<HeaderVerdict>
    where
        I: Iterator<Item = io::Result<String>>,
    {
        let mut lines = lines.enumerate();
        let first = loop {
            match lines.next() {
                Some((_, line)) => {
                    let line = line?;
                    if !is_preamble(&line) {
                        break line;
                    }
                }
                None => return Ok(HeaderVerdict::MissingFirstLine),
            }
        };
        let Some(marker) = self.first_line.captures(&first).and_then(|c| c.get(1)) else {
            return Ok(HeaderVerdict::MissingFirstLine);
        };
        let marker = marker.as_str();

        for expected in &self.body {
            let Some((idx, actual)) = lines.next() else {
                return Ok(HeaderVerdict::Truncated);
            };
            if actual?.strip_prefix(marker) != Some(expected.as_str()) {
                return Ok(HeaderVerdict::BodyMismatch { line: idx + 1 });
            }
        }
        Ok(HeaderVerdict::Valid)
    }
}

/// Lines split on `\n` only, decoded lossily so binary files still yield
/// (mismatching) lines.
struct RawLines<R>(R);

impl<R: BufRead> Iterator for RawLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = Vec::new();
        match self.0.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                }
                Some(Ok(String::from_utf8_lossy(&buf).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Blank lines, shebangs and block-comment openers precede the header.
fn is_preamble(line: &str) -> bool {
    line.trim().is_empty() || line.starts_with("#!") || line.starts_with("/*")
}

pub struct CopyrightCheck {
    filter: FilterSpec,
    validator: CopyrightValidator,
}

impl CopyrightCheck {
    pub fn new(organization: &str) -> Result<Self, PresubmitError> {
        Ok(Self {
            filter: FilterSpec::any().exclude(EXCLUDE_FROM_COPYRIGHT_NOTICE)?,
            validator: CopyrightValidator::new(organization)?,
        })
    }
}

impl Check for CopyrightCheck {
    fn name(&self) -> &str {
        CHECK_NAME
    }

    fn filter(&self) -> Option<&FilterSpec> {
        Some(&self.filter)
    }

    fn run(&self, ctx: &CheckContext<'_>, paths: &[String]) -> Result<(), PresubmitError> {
        let mut errors = Vec::new();
        for path in paths {
            match self.validator.validate_file(&ctx.env.root.join(path)) {
                Ok(HeaderVerdict::Valid) => {}
                Ok(verdict) => {
                    debug!(path = %path, ?verdict, "copyright header rejected");
                    errors.push(path.clone());
                }
                Err(e) => {
                    warn!(path = %path, error = %e, "cannot read file for copyright check");
                    errors.push(path.clone());
                }
            }
        }

        if errors.is_empty() {
            return Ok(());
        }
        let message = format!(
            "{} with a missing or incorrect copyright notice",
            plural(errors.len(), "file")
        );
        warn!("{}:\n{}", message, errors.join("\n"));
        Err(CheckFailure::with_paths(message, errors).into())
    }
}
