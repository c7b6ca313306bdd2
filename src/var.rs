use std::fmt::Debug;
use std::rc::Rc;

use crate::body::CellBody;
use crate::channel::Handle;
use crate::{Expr, Observable};

/// A plain observable value.
///
/// `Var` owns its value: dropping it revokes every listener registered on it,
/// and derived cells reading from it settle on their last value and detach.
pub struct Var<T>
where
	T: Clone + 'static,
{
	body: Rc<CellBody<T>>,
}

impl<T> Default for Var<T>
where
	T: Clone + Default + 'static,
{
	fn default() -> Self {
		Var::new(Default::default())
	}
}

impl<T> From<T> for Var<T>
where
	T: Clone + 'static,
{
	fn from(value: T) -> Self {
		Var::new(value)
	}
}

pub trait Toggle {
	fn toggle(&mut self);
}

impl Toggle for bool {
	fn toggle(&mut self) {
		*self = !*self
	}
}

impl<T> Var<T>
where
	T: Clone + 'static,
{
	pub fn new(value: T) -> Self {
		Var {
			body: CellBody::new(value),
		}
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

	#[inline]
	pub fn set(&self, value: T) {
		let _ = self.body.replace(value);
	}

	#[inline]
	pub fn replace(&self, value: T) -> T {
		self.body.replace(value)
	}

	/// Edits the value in place and notifies as [`Var::set`] does.
	#[inline]
	pub fn update(&self, func: impl FnOnce(&mut T)) {
		self.body.update(func)
	}

	#[inline]
	pub fn toggle(&self)
	where
		T: Toggle,
	{
		self.update(T::toggle)
	}

	/// Live registrations on this cell, derived cells bound to it included.
	pub fn listeners(&self) -> usize {
		self.body.listeners()
	}

	/// Fired after each write, once the new value is in place.
	pub fn on_change(&self, callback: impl Fn() + 'static) -> Handle {
		self.body.on_change(Box::new(callback))
	}

	/// Fired after change listeners, with the previous and the new value.
	pub fn on_value(&self, callback: impl Fn(&T, &T) + 'static) -> Handle {
		self.body.on_value(Box::new(callback))
	}

	/// An expression reading this cell.
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

impl<T> Observable for Var<T>
where
	T: Clone + 'static,
{
	type Value = T;

	fn get(&self) -> T {
		Var::get(self)
	}

	fn on_change(&self, callback: impl Fn() + 'static) -> Handle {
		Var::on_change(self, callback)
	}

	fn on_value(&self, callback: impl Fn(&T, &T) + 'static) -> Handle {
		Var::on_value(self, callback)
	}

	fn expr(&self) -> Expr<T> {
		Var::expr(self)
	}
}

impl<T> Drop for Var<T>
where
	T: Clone + 'static,
{
	fn drop(&mut self) {
		self.body.close()
	}
}

impl<T> Debug for Var<T>
where
	T: Clone + Debug + 'static,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.with(|value| value.fmt(f))
	}
}
