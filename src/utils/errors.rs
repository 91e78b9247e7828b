use std::fmt;

/// Fatal conditions that abort a run. Evidence-indeterminate situations
/// (unmappable coordinates, clipped-away positions) are not errors and are
/// resolved locally as "no support".
#[derive(Debug, Clone)]
pub enum LyrebirdError {
    MalformedVariant(String),
    MalformedRead(String),
    RealignerInitialization(String),
    RealignmentInvocation(String),
    VcfIo(String),
    BamIo(String),
    InvalidConfiguration(String),
}

impl fmt::Display for LyrebirdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LyrebirdError::MalformedVariant(msg) => write!(f, "Malformed variant record: {}", msg),
            LyrebirdError::MalformedRead(msg) => write!(f, "Malformed read record: {}", msg),
            LyrebirdError::RealignerInitialization(msg) => {
                write!(f, "Failed to initialize realigner: {}", msg)
            }
            LyrebirdError::RealignmentInvocation(msg) => {
                write!(f, "Realignment invocation failed: {}", msg)
            }
            LyrebirdError::VcfIo(msg) => write!(f, "VCF I/O error: {}", msg),
            LyrebirdError::BamIo(msg) => write!(f, "BAM I/O error: {}", msg),
            LyrebirdError::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for LyrebirdError {}
