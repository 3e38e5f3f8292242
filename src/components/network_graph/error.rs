use thiserror::Error;

/// Rejected graph-builder input. The host treats this as a recoverable
/// empty state (render nothing, show a prompt), never a crash.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvalidGraphInput {
	#[error("author list is empty")]
	EmptyAuthors,
	#[error("lead investigator `{0}` is not in the author list")]
	UnknownLead(String),
}
