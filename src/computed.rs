use std::fmt::Debug;
use std::rc::Rc;

use crate::body::CellBody;
use crate::channel::Handle;
use crate::inputs::Inputs;
use crate::{Error, Expr, Observable};

/// A cell whose value can be derived from other cells.
///
/// While bound, writes are rejected with [`Error::AlreadyBound`] and the value
/// is recomputed lazily: an upstream change fires the change listeners right
/// away, but the combinator only runs on the next read, which is also when
/// value listeners learn about the new value.
///
/// ```
/// use bindcell::{Computed, Var};
///
/// let a = Var::new(3i32);
/// let square = Computed::from_expr(&a * &a);
/// assert_eq!(square.get(), 9);
///
/// a.set(5);
/// assert_eq!(square.get(), 25);
/// ```
pub struct Computed<T>
where
	T: Clone + 'static,
{
	body: Rc<CellBody<T>>,
}

impl<T> Default for Computed<T>
where
	T: Clone + Default + 'static,
{
	fn default() -> Self {
		Computed::new(Default::default())
	}
}

impl<T> Computed<T>
where
	T: Clone + 'static,
{
	/// An unbound cell holding `value`.
	pub fn new(value: T) -> Self {
		Computed {
			body: CellBody::new(value),
		}
	}

	pub fn from_expr(expr: Expr<T>) -> Self
	where
		T: Default,
	{
		let computed = Computed::default();
		computed.bind_expr(expr);
		computed
	}

	/// A cell bound to `func` over `inputs`.
	pub fn bound<I, F>(inputs: I, func: F) -> Self
	where
		I: Inputs,
		F: Fn(I::Values) -> T + 'static,
		T: Default,
	{
		Computed::from_expr(Expr::new(inputs, func))
	}

	/// A cell following the value of `source`.
	pub fn mirror<O>(source: &O) -> Self
	where
		O: Observable<Value = T>,
		T: Default,
	{
		Computed::from_expr(source.expr())
	}

	#[inline]
	pub fn get(&self) -> T {
		self.body.get()
	}

	/// Reads the value without cloning it.
	///
	/// The cell must not be written from inside `func`.
	#[inline]
	pub fn with<R>(&self, func: impl FnOnce(&T) -> R) -> R {
		self.body.with(func)
	}

	pub fn set(&self, value: T) -> Result<(), Error> {
		self.replace(value).map(|_| ())
	}

	pub fn replace(&self, value: T) -> Result<T, Error> {
		if self.is_bound() {
			return Err(Error::AlreadyBound);
		}

		Ok(self.body.replace(value))
	}

	pub fn update(&self, func: impl FnOnce(&mut T)) -> Result<(), Error> {
		if self.is_bound() {
			return Err(Error::AlreadyBound);
		}

		self.body.update(func);
		Ok(())
	}

	/// Binds this cell to `func` applied over `inputs`, replacing any
	/// previous binding.
	///
	/// Nothing is computed until the next read. A cell appearing
	/// several times in `inputs` is only listened to once.
	pub fn bind<I, F>(&self, inputs: I, func: F)
	where
		I: Inputs,
		F: Fn(I::Values) -> T + 'static,
	{
		self.bind_expr(Expr::new(inputs, func))
	}

	pub fn bind_expr(&self, expr: Expr<T>) {
		self.body.bind(expr)
	}

	/// Brings the value up to date, then stops following the inputs.
	pub fn unbind(&self) {
		self.body.unbind()
	}

	pub fn is_bound(&self) -> bool {
		self.body.is_bound()
	}

	pub fn listeners(&self) -> usize {
		self.body.listeners()
	}

	/// Fired when the value changed or, while bound, when an input changed.
	pub fn on_change(&self, callback: impl Fn() + 'static) -> Handle {
		self.body.on_change(Box::new(callback))
	}

	/// Fired with the previous and the new value, once the new value is known.
	pub fn on_value(&self, callback: impl Fn(&T, &T) + 'static) -> Handle {
		self.body.on_value(Box::new(callback))
	}

	pub fn expr(&self) -> Expr<T> {
		self.body.expr()
	}

	pub fn map<F, R>(&self, func: F) -> Expr<R>
	where
		F: Fn(T) -> R + 'static,
		R: 'static,
	{
		self.expr().map(func)
	}
}

impl<T> Observable for Computed<T>
where
	T: Clone + 'static,
{
	type Value = T;

	fn get(&self) -> T {
		Computed::get(self)
	}

	fn on_change(&self, callback: impl Fn() + 'static) -> Handle {
		Computed::on_change(self, callback)
	}

	fn on_value(&self, callback: impl Fn(&T, &T) + 'static) -> Handle {
		Computed::on_value(self, callback)
	}

	fn expr(&self) -> Expr<T> {
		Computed::expr(self)
	}
}

impl<T> Drop for Computed<T>
where
	T: Clone + 'static,
{
	fn drop(&mut self) {
		self.body.close()
	}
}

impl<T> Debug for Computed<T>
where
	T: Clone + Debug + 'static,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("Computed").field(&self.body).finish()
	}
}
