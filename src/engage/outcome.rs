use serde::Serialize;
use std::fmt;

/// Which path activated a step's control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Via {
    /// Primary control, normal click.
    Primary,
    /// Primary control, forced click after the normal one failed.
    PrimaryForced,
    /// Alternate control, normal click.
    Alternate,
    /// Alternate control, forced click.
    AlternateForced,
    /// No control at all; a key press in the input did it.
    KeyPress,
}

impl Via {
    pub(crate) fn primary(forced: bool) -> Self {
        if forced {
            Self::PrimaryForced
        } else {
            Self::Primary
        }
    }

    /// Anything other than a normal click on the primary control.
    pub fn is_fallback(&self) -> bool {
        !matches!(self, Self::Primary)
    }
}

impl fmt::Display for Via {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Primary => "primary",
            Self::PrimaryForced => "primary, forced",
            Self::Alternate => "alternate",
            Self::AlternateForced => "alternate, forced",
            Self::KeyPress => "key press",
        };
        f.write_str(s)
    }
}

/// Result of one engage step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum StepOutcome {
    Done(Via),
    /// Optional control never showed up.
    Absent,
    /// Not attempted because an earlier step made it pointless.
    Skipped,
    /// Required control missing, both activation tiers failed, or a
    /// collaborator errored.
    Failed(String),
}

impl StepOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done(via) => write!(f, "done ({})", via),
            Self::Absent => f.write_str("absent"),
            Self::Skipped => f.write_str("skipped"),
            Self::Failed(msg) => write!(f, "failed: {}", msg),
        }
    }
}

/// Per-step outcomes of one engage pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngageReport {
    pub navigate: StepOutcome,
    pub reshare: StepOutcome,
    pub dismiss: StepOutcome,
    pub compose: StepOutcome,
    pub submit: StepOutcome,
    /// Generated reply text, if generation got that far.
    pub reply: Option<String>,
}

impl EngageReport {
    pub(crate) fn new() -> Self {
        Self {
            navigate: StepOutcome::Skipped,
            reshare: StepOutcome::Skipped,
            dismiss: StepOutcome::Skipped,
            compose: StepOutcome::Skipped,
            submit: StepOutcome::Skipped,
            reply: None,
        }
    }

    /// The post had no permalink; nothing was attempted.
    pub(crate) fn not_navigable() -> Self {
        Self {
            navigate: StepOutcome::Absent,
            ..Self::new()
        }
    }

    pub fn reshared(&self) -> bool {
        self.reshare.is_done()
    }

    pub fn replied(&self) -> bool {
        self.submit.is_done()
    }
}
