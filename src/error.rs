#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	/// The cell is driven by a binding, so it cannot be written directly.
	#[error("cell is bound to other cells, unbind it before writing to it")]
	AlreadyBound,
}
