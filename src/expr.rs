use std::rc::Rc;

use crate::dependencies::{Dependencies, Dependency};
use crate::inputs::Inputs;
use crate::{Computed, Var};

/// A deferred computation over cells.
///
/// An expression only describes how to compute a value: building or combining
/// expressions never subscribes to anything. Cells get listened to once the
/// expression is bound into a [`Computed`].
///
/// Combining two expressions yields a single expression whose inputs are the
/// inputs of the left operand followed by the ones of the right operand.
pub struct Expr<T> {
	eval: Rc<dyn Fn() -> Option<T>>,
	dependencies: Dependencies,
}

impl<T> Clone for Expr<T> {
	fn clone(&self) -> Self {
		Self {
			eval: self.eval.clone(),
			dependencies: self.dependencies.clone(),
		}
	}
}

impl<T> Expr<T>
where
	T: 'static,
{
	/// Applies `func` to the values of `inputs`.
	pub fn new<I, F>(inputs: I, func: F) -> Self
	where
		I: Inputs,
		F: Fn(I::Values) -> T + 'static,
	{
		let (read, dependencies) = inputs.into_parts();
		Expr {
			eval: Rc::new(move || read().map(&func)),
			dependencies,
		}
	}

	pub fn constant(value: T) -> Self
	where
		T: Clone,
	{
		Expr::from_fn(move || Some(value.clone()))
	}

	pub(crate) fn from_fn(eval: impl Fn() -> Option<T> + 'static) -> Self {
		Expr {
			eval: Rc::new(eval),
			dependencies: Dependencies::new(),
		}
	}

	pub(crate) fn depends_on(&mut self, dependency: Dependency) {
		self.dependencies.push(dependency);
	}

	pub fn map<U, F>(self, func: F) -> Expr<U>
	where
		U: 'static,
		F: Fn(T) -> U + 'static,
	{
		let eval = self.eval;
		Expr {
			eval: Rc::new(move || eval().map(&func)),
			dependencies: self.dependencies,
		}
	}

	/// Merges `self` and `other` into one expression computing `op(self, other)`.
	///
	/// Constants passed as `other` are captured by the closure and add no input.
	pub fn combine<R, V, F>(self, other: R, op: F) -> Expr<V>
	where
		R: IntoExpr,
		V: 'static,
		F: Fn(T, R::Value) -> V + 'static,
	{
		let other = other.into_expr();
		let (left, right) = (self.eval, other.eval);

		let mut dependencies = self.dependencies;
		dependencies.append(other.dependencies);

		Expr {
			eval: Rc::new(move || Some(op(left()?, right()?))),
			dependencies,
		}
	}

	/// Computes the value right away, without subscribing.
	///
	/// `None` if one of the cells read has been destroyed.
	pub fn evaluate(&self) -> Option<T> {
		(self.eval)()
	}

	/// The cells read, in input order, duplicates included.
	pub fn dependencies(&self) -> &Dependencies {
		&self.dependencies
	}

	pub(crate) fn into_parts(self) -> (Rc<dyn Fn() -> Option<T>>, Dependencies) {
		(self.eval, self.dependencies)
	}
}

impl<T> std::fmt::Debug for Expr<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Expr")
			.field("dependencies", &self.dependencies)
			.finish_non_exhaustive()
	}
}

/// Conversion into an [`Expr`], used by operators and input tuples.
pub trait IntoExpr {
	type Value: 'static;

	fn into_expr(self) -> Expr<Self::Value>;
}

impl<T: 'static> IntoExpr for Expr<T> {
	type Value = T;

	fn into_expr(self) -> Expr<T> {
		self
	}
}

impl<'a, T: 'static> IntoExpr for &'a Expr<T> {
	type Value = T;

	fn into_expr(self) -> Expr<T> {
		self.clone()
	}
}

impl<'a, T: Clone + 'static> IntoExpr for &'a Var<T> {
	type Value = T;

	fn into_expr(self) -> Expr<T> {
		self.expr()
	}
}

impl<'a, T: Clone + 'static> IntoExpr for &'a Computed<T> {
	type Value = T;

	fn into_expr(self) -> Expr<T> {
		self.expr()
	}
}

macro_rules! constant_into_expr {
	($($ty:ty),* $(,)?) => {
		$(
			impl IntoExpr for $ty {
				type Value = $ty;

				fn into_expr(self) -> Expr<$ty> {
					Expr::constant(self)
				}
			}
		)*
	};
}

constant_into_expr!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool);
