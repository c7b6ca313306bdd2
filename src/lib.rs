//! Observable cells, derived cells kept in sync through lazy bindings,
//! and expressions composing computations over cells.

pub mod macros;

mod addr;
mod binding;
mod body;
mod channel;
mod computed;
mod dependencies;
mod error;
mod expr;
mod inputs;
mod ops;
mod var;

pub use binding::Binding;
pub use channel::{ChangeChannel, Channel, Handle, HandleGuard, ValueChannel};
pub use computed::Computed;
pub use dependencies::{Dependencies, Dependency};
pub use error::Error;
pub use expr::{Expr, IntoExpr};
pub use inputs::Inputs;
pub use var::{Toggle, Var};

/// A cell that can be read and listened to.
pub trait Observable {
	type Value: Clone + 'static;

	/// The current value. Derived cells recompute first if needed.
	fn get(&self) -> Self::Value;

	/// Registers a listener notified whenever the cell changes.
	fn on_change(&self, callback: impl Fn() + 'static) -> Handle;

	/// Registers a listener receiving the previous and the new value.
	fn on_value(&self, callback: impl Fn(&Self::Value, &Self::Value) + 'static) -> Handle;

	/// An expression reading this cell.
	fn expr(&self) -> Expr<Self::Value>;
}
