//! The external diagram renderer client.
//!
//! Graph layout is an external collaborator: an opaque, potentially slow,
//! potentially absent process. [`CommandRenderer`] speaks a minimal wire
//! protocol to it (one JSON request on stdin, one image reference line on
//! stdout) and enforces a hard per-call timeout, killing the child on
//! expiry.
//!
//! [`generate`] wraps a renderer with the build policy: a cancellation
//! check before every attempt, one retry with a reduced complexity cap
//! after a timeout, and downgrade-instead-of-error on final failure. A
//! diagram failure is never fatal to the build.

use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;
use wait_timeout::ChildExt;

use docloom_model::DocObject;

use crate::spec::{DecisionReason, DiagramSpec};

/// Errors from one renderer invocation.
#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("renderer I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("renderer `{program}` timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("renderer `{program}` exited with {status}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
    },

    #[error("renderer produced no image reference")]
    EmptyOutput,
}

/// A reference to a generated diagram image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct ImageRef {
    /// Location of the generated image, as reported by the renderer.
    pub uri: String,
}

/// The request handed to the external renderer.
#[derive(Debug, Serialize)]
pub struct DiagramRequest<'a> {
    pub spec: &'a DiagramSpec,
    /// Node budget for this attempt. Starts at the decided node count and
    /// is halved for the post-timeout retry.
    pub max_nodes: usize,
    pub object: DiagramObject<'a>,
}

/// The slice of the object the renderer needs.
#[derive(Debug, Serialize)]
pub struct DiagramObject<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub bases: &'a [String],
    pub subclasses: &'a [String],
    pub calls: &'a [String],
}

impl<'a> DiagramObject<'a> {
    pub fn from_object(obj: &'a DocObject) -> Self {
        DiagramObject {
            id: &obj.id,
            name: &obj.name,
            bases: &obj.bases,
            subclasses: &obj.subclasses,
            calls: &obj.calls,
        }
    }
}

/// Renders accepted diagram specs into image references.
pub trait DiagramRenderer: Send + Sync {
    fn render(&self, request: &DiagramRequest<'_>) -> Result<ImageRef, DiagramError>;
}

/// Renders by invoking an external program.
///
/// The request is serialized as JSON to the child's stdin; the first
/// non-empty stdout line is taken as the image reference. Stderr passes
/// through for operator visibility.
pub struct CommandRenderer {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandRenderer {
    /// Creates a renderer invoking the given program with a 10 second
    /// default timeout.
    pub fn new(program: impl Into<String>) -> Self {
        CommandRenderer {
            program: program.into(),
            args: Vec::new(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Appends an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Sets the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl DiagramRenderer for CommandRenderer {
    fn render(&self, request: &DiagramRequest<'_>) -> Result<ImageRef, DiagramError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            let payload =
                serde_json::to_vec(request).expect("diagram request serialization is infallible");
            stdin.write_all(&payload)?;
        }

        match child.wait_timeout(self.timeout)? {
            Some(status) if status.success() => {}
            Some(status) => {
                return Err(DiagramError::Failed {
                    program: self.program.clone(),
                    status,
                });
            }
            None => {
                child.kill()?;
                child.wait()?;
                return Err(DiagramError::Timeout {
                    program: self.program.clone(),
                    timeout: self.timeout,
                });
            }
        }

        let mut output = String::new();
        if let Some(mut stdout) = child.stdout.take() {
            stdout.read_to_string(&mut output)?;
        }
        let uri = output.lines().find(|l| !l.trim().is_empty());
        match uri {
            Some(line) => Ok(ImageRef {
                uri: line.trim().to_string(),
            }),
            None => Err(DiagramError::EmptyOutput),
        }
    }
}

/// An accepted-or-downgraded spec plus the image, when one was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramOutcome {
    pub spec: DiagramSpec,
    pub image: Option<ImageRef>,
}

/// Drives one renderer call under the build policy.
///
/// Rejected specs pass through untouched. For accepted specs: check the
/// cancellation flag, attempt the render, and on timeout retry once with
/// the node budget halved. Any final failure downgrades the spec
/// ([`DecisionReason::Timeout`] / [`DecisionReason::RendererFailed`])
/// instead of erroring; the object still renders without its diagram.
pub fn generate(
    renderer: &dyn DiagramRenderer,
    spec: &DiagramSpec,
    obj: &DocObject,
    cancel: &AtomicBool,
) -> DiagramOutcome {
    if !spec.accepted || spec.kind.is_none() {
        return DiagramOutcome {
            spec: spec.clone(),
            image: None,
        };
    }

    let budgets = [spec.node_count, spec.node_count / 2];
    let mut timed_out = false;
    for (attempt, max_nodes) in budgets.into_iter().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            return DiagramOutcome {
                spec: spec.downgraded(DecisionReason::Cancelled),
                image: None,
            };
        }

        let request = DiagramRequest {
            spec,
            max_nodes,
            object: DiagramObject::from_object(obj),
        };
        match renderer.render(&request) {
            Ok(image) => {
                return DiagramOutcome {
                    spec: spec.clone(),
                    image: Some(image),
                };
            }
            Err(DiagramError::Timeout { .. }) => {
                timed_out = true;
                if attempt == 0 {
                    warn!(
                        object = %spec.object_id,
                        max_nodes,
                        "diagram render timed out, retrying with reduced complexity cap"
                    );
                }
            }
            Err(err) => {
                warn!(object = %spec.object_id, error = %err, "diagram render failed");
                return DiagramOutcome {
                    spec: spec.downgraded(DecisionReason::RendererFailed),
                    image: None,
                };
            }
        }
    }

    let reason = if timed_out {
        DecisionReason::Timeout
    } else {
        DecisionReason::RendererFailed
    };
    warn!(object = %spec.object_id, reason = %reason, "diagram generation abandoned");
    DiagramOutcome {
        spec: spec.downgraded(reason),
        image: None,
    }
}
