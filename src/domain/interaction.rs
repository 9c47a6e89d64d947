/// Output level selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    VerySilent,
    Silent,
    #[default]
    Normal,
    Verbose,
    VeryVerbose,
}

impl Verbosity {
    /// Combine the four output flags. Silence wins over verbosity.
    pub fn from_flags(verbose: bool, very_verbose: bool, silent: bool, very_silent: bool) -> Self {
        if very_silent {
            Verbosity::VerySilent
        } else if silent {
            Verbosity::Silent
        } else if very_verbose {
            Verbosity::VeryVerbose
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    /// Default tracing filter directive for this level.
    pub fn filter_directive(self) -> &'static str {
        match self {
            Verbosity::VerySilent => "off",
            Verbosity::Silent => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "info",
            Verbosity::VeryVerbose => "trace",
        }
    }
}

/// Interaction settings fixed once flags are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionMode {
    pub verbosity: Verbosity,
    /// Report mutating actions instead of performing them.
    pub dry_run: bool,
    /// Confirm before each major action.
    pub step: bool,
}

impl InteractionMode {
    pub fn shows_status(&self) -> bool {
        self.verbosity >= Verbosity::Normal
    }

    pub fn is_very_silent(&self) -> bool {
        self.verbosity == Verbosity::VerySilent
    }
}
