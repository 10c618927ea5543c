// ABOUTME: The image puller: decides whether a pull is required and runs it.
// ABOUTME: Combines reference parsing, local inspection, and the pull policy.

mod error;

pub use error::{PullerError, PullerErrorKind};

use std::collections::VecDeque;
use std::io;
use std::io::{BufRead, BufReader, Lines, Read};
use std::process::{Child, ChildStdout, Command, Stdio};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::engine::{self, ContainerEngine, InspectError};
use crate::types::{ImageRef, PullPolicy};

/// Result of one assessment pass.
///
/// Created fresh on every [`ImagePuller::assess`] call and overwritten
/// wholesale, never partially merged.
#[derive(Debug, Clone, Serialize)]
pub struct PullAssessment {
    /// Whether a pull must be performed.
    pub pull_required: bool,
    /// The tag the reference resolved to.
    pub tag: String,
    /// `None` when the policy decided without consulting the local catalog.
    pub locally_present: Option<bool>,
    /// The policy that produced this assessment.
    pub policy: PullPolicy,
}

/// Decides whether a container image pull is required and executes it.
///
/// One instance per (engine, image, arguments, policy). `assess` may be
/// called repeatedly and re-evaluates from current external state; a
/// successful `pull` supersedes the stored assessment with
/// `pull_required = false`.
pub struct ImagePuller {
    engine: ContainerEngine,
    image: ImageRef,
    arguments: Option<Vec<String>>,
    policy: PullPolicy,
    assessment: Option<PullAssessment>,
}

impl ImagePuller {
    pub fn new(
        engine: ContainerEngine,
        image: ImageRef,
        arguments: Option<Vec<String>>,
        policy: PullPolicy,
    ) -> Self {
        Self {
            engine,
            image,
            arguments,
            policy,
            assessment: None,
        }
    }

    pub fn engine(&self) -> &ContainerEngine {
        &self.engine
    }

    pub fn image(&self) -> &ImageRef {
        &self.image
    }

    pub fn policy(&self) -> PullPolicy {
        self.policy
    }

    /// The most recent assessment, if any.
    pub fn assessment(&self) -> Option<&PullAssessment> {
        self.assessment.as_ref()
    }

    /// Evaluate the pull policy against the current local image catalog.
    ///
    /// The catalog is only consulted for policies whose outcome depends on
    /// local presence (`missing`, `tag`); `always` and `never` make zero
    /// engine calls. Inspection failures degrade to "not present" so a
    /// needed pull is never silently skipped; only a missing engine binary
    /// is fatal.
    pub fn assess(&mut self) -> Result<&PullAssessment, PullerError> {
        let locally_present = if self.policy.consults_local_catalog() {
            Some(self.is_present()?)
        } else {
            None
        };

        let pull_required = self
            .policy
            .pull_required(locally_present.unwrap_or(false), self.image.is_latest());

        debug!(
            image = %self.image,
            policy = %self.policy,
            ?locally_present,
            pull_required,
            "image assessed"
        );

        Ok(self.assessment.insert(PullAssessment {
            pull_required,
            tag: self.image.tag().to_string(),
            locally_present,
            policy: self.policy,
        }))
    }

    fn is_present(&self) -> Result<bool, PullerError> {
        match engine::list_local_images(&self.engine) {
            Ok(catalog) => Ok(catalog.contains(self.image.repository(), self.image.tag())),
            Err(source @ InspectError::EngineNotFound(_)) => {
                Err(PullerError::Configuration { source })
            }
            Err(error) => {
                warn!(%error, "image inspection failed, assuming image is not present");
                Ok(false)
            }
        }
    }

    /// The argv for the pull subprocess.
    ///
    /// Each extra argument string is tokenized with shell quoting rules,
    /// so `"--tls-verify false"` contributes two tokens. The image is
    /// passed exactly as the caller gave it.
    pub fn pull_command(&self) -> Vec<String> {
        let mut argv = vec![self.engine.binary().to_string(), "pull".to_string()];
        if let Some(arguments) = &self.arguments {
            for argument in arguments {
                argv.extend(shlex::split(argument).unwrap_or_default());
            }
        }
        argv.push(self.image.reference().to_string());
        argv
    }

    /// Pull the image if the current assessment says it is required.
    ///
    /// Runs an assessment first when none has been made. When no pull is
    /// required this returns an empty stream without spawning anything.
    /// Otherwise the returned [`PullStream`] lazily yields the pull
    /// subprocess output line by line; see its docs for completion
    /// semantics.
    pub fn pull(&mut self) -> Result<PullStream<'_>, PullerError> {
        if self.assessment.is_none() {
            self.assess()?;
        }

        let required = self
            .assessment
            .as_ref()
            .is_some_and(|assessment| assessment.pull_required);
        if !required {
            debug!(image = %self.image, "pull not required, skipping");
            return Ok(PullStream::noop());
        }

        let argv = self.pull_command();
        let command_line = argv.join(" ");
        info!(command = %command_line, "pulling image");

        let mut command = Command::new(&argv[0]);
        command
            .args(&argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command.spawn().map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                PullerError::Configuration {
                    source: InspectError::EngineNotFound(self.engine.binary().to_string()),
                }
            } else {
                PullerError::SpawnPull {
                    command: command_line.clone(),
                    source,
                }
            }
        })?;

        let lines = child.stdout.take().map(|stdout| BufReader::new(stdout).lines());

        Ok(PullStream {
            puller: Some(self),
            child: Some(child),
            lines,
            trailing: VecDeque::new(),
            captured: Vec::new(),
            finished: false,
        })
    }

    fn mark_pulled(&mut self) {
        self.assessment = Some(PullAssessment {
            pull_required: false,
            tag: self.image.tag().to_string(),
            locally_present: Some(true),
            policy: self.policy,
        });
    }
}

/// Lazy, forward-only stream of pull subprocess output lines.
///
/// The subprocess is reaped on every exit path: iterating to the end waits
/// on the child, and dropping the stream early drains the remaining output
/// first. On a zero exit status the owning puller's assessment is
/// superseded with `pull_required = false`; on a non-zero exit the final
/// item is a [`PullerError::PullFailed`] carrying the exit status and the
/// captured output, and the assessment is left untouched.
pub struct PullStream<'a> {
    puller: Option<&'a mut ImagePuller>,
    child: Option<Child>,
    lines: Option<Lines<BufReader<ChildStdout>>>,
    trailing: VecDeque<String>,
    captured: Vec<String>,
    finished: bool,
}

impl PullStream<'_> {
    fn noop() -> PullStream<'static> {
        PullStream {
            puller: None,
            child: None,
            lines: None,
            trailing: VecDeque::new(),
            captured: Vec::new(),
            finished: true,
        }
    }

    /// Drain the stream, collecting all output lines.
    ///
    /// Returns the lines on success; the first error otherwise.
    pub fn wait(mut self) -> Result<Vec<String>, PullerError> {
        let mut collected = Vec::new();
        for line in &mut self {
            collected.push(line?);
        }
        Ok(collected)
    }

    fn finish(&mut self) -> Option<Result<String, PullerError>> {
        self.finished = true;

        let mut child = self.child.take()?;
        match child.wait() {
            Ok(status) if status.success() => {
                if let Some(puller) = self.puller.take() {
                    puller.mark_pulled();
                }
                None
            }
            Ok(status) => Some(Err(PullerError::PullFailed {
                status: status.code().unwrap_or(-1),
                output: self.captured.join("\n"),
            })),
            Err(source) => Some(Err(PullerError::Stream { source })),
        }
    }
}

impl Iterator for PullStream<'_> {
    type Item = Result<String, PullerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if let Some(mut lines) = self.lines.take() {
            match lines.next() {
                Some(Ok(line)) => {
                    self.lines = Some(lines);
                    self.captured.push(line.clone());
                    return Some(Ok(line));
                }
                Some(Err(source)) => {
                    let result = self.finish();
                    return result.or(Some(Err(PullerError::Stream { source })));
                }
                None => {
                    // stdout is done; surface any stderr lines before the
                    // exit status so failure output is not lost.
                    if let Some(child) = self.child.as_mut()
                        && let Some(mut stderr) = child.stderr.take()
                    {
                        let mut buffer = String::new();
                        if stderr.read_to_string(&mut buffer).is_ok() {
                            self.trailing
                                .extend(buffer.lines().map(|line| line.to_string()));
                        }
                    }
                }
            }
        }

        if let Some(line) = self.trailing.pop_front() {
            self.captured.push(line.clone());
            return Some(Ok(line));
        }

        self.finish()
    }
}

impl Drop for PullStream<'_> {
    fn drop(&mut self) {
        // Fully drain so the child is never left unreaped.
        while !self.finished {
            if self.next().is_none() {
                break;
            }
        }
    }
}
