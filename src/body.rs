use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::binding::Binding;
use crate::channel::{ChangeChannel, Handle, ValueChannel};
use crate::dependencies::{Dependency, Source};
use crate::expr::Expr;

/// Storage shared by [`Var`](crate::Var) and [`Computed`](crate::Computed).
///
/// Owners hold the only strong reference; bindings and expressions
/// downstream reach it through `Weak`. The binding is only allocated
/// once the cell is bound for the first time.
pub(crate) struct CellBody<T: 'static> {
	this: Weak<CellBody<T>>,
	value: RefCell<T>,
	changed: ChangeChannel,
	value_changed: ValueChannel<T>,
	binding: RefCell<Option<Binding<T>>>,
}

impl<T> CellBody<T>
where
	T: Clone + 'static,
{
	pub fn new(value: T) -> Rc<Self> {
		Rc::new_cyclic(|this: &Weak<Self>| CellBody {
			this: this.clone(),
			value: RefCell::new(value),
			changed: ChangeChannel::new(),
			value_changed: ValueChannel::new(),
			binding: RefCell::new(None),
		})
	}

	fn new_binding(&self) -> Binding<T> {
		let on_invalidate = {
			let this = self.this.clone();
			move || {
				if let Some(body) = this.upgrade() {
					body.changed.fire()
				}
			}
		};

		let on_close = {
			let this = self.this.clone();
			move || {
				if let Some(body) = this.upgrade() {
					tracing::trace!("upstream cell destroyed, detaching binding");
					body.unbind()
				}
			}
		};

		Binding::new(on_invalidate, on_close)
	}

	pub fn get(&self) -> T {
		self.refresh();
		self.value.borrow().clone()
	}

	pub fn with<R>(&self, func: impl FnOnce(&T) -> R) -> R {
		self.refresh();
		func(&self.value.borrow())
	}

	/// Recomputes the value if the binding was invalidated since the last read.
	fn refresh(&self) {
		let eval = {
			let binding = self.binding.borrow();
			let Some(binding) = binding.as_ref() else {
				return;
			};
			if !binding.is_active() || binding.is_valid() {
				return;
			}

			// Marked before evaluating, so that an input changing
			// mid-evaluation invalidates us again.
			binding.mark_valid();
			binding.evaluator()
		};

		tracing::trace!("recomputing derived value");
		if let Some(value) = eval.and_then(|eval| eval()) {
			let old = self.value.replace(value.clone());
			self.value_changed.fire(&old, &value);
		}
	}

	/// Installs `value`, then notifies change listeners followed by value listeners.
	pub fn replace(&self, value: T) -> T {
		let old = self.value.replace(value.clone());
		self.changed.fire();
		self.value_changed.fire(&old, &value);
		old
	}

	pub fn update(&self, func: impl FnOnce(&mut T)) {
		let old = self.value.borrow().clone();
		func(&mut self.value.borrow_mut());
		let new = self.value.borrow().clone();
		self.changed.fire();
		self.value_changed.fire(&old, &new);
	}

	pub fn is_bound(&self) -> bool {
		self.binding.borrow().as_ref().map_or(false, Binding::is_active)
	}

	pub fn bind(&self, expr: Expr<T>) {
		// Dropped outside the borrow, revoking runs release callbacks.
		let previous = self.binding.borrow_mut().take();
		std::mem::drop(previous);

		let mut binding = self.new_binding();
		binding.reset(expr);
		*self.binding.borrow_mut() = Some(binding);
		self.changed.fire();
	}

	/// Settles on the latest derived value, then detaches the binding.
	pub fn unbind(&self) {
		self.refresh();
		let previous = self.binding.borrow_mut().take();
		std::mem::drop(previous);
	}

	/// Number of registrations on both channels, bindings downstream included.
	pub fn listeners(&self) -> usize {
		self.changed.len() + self.value_changed.len()
	}

	pub fn on_change(&self, callback: Box<dyn Fn()>) -> Handle {
		self.changed.add(callback)
	}

	pub fn on_value(&self, callback: Box<dyn Fn(&T, &T)>) -> Handle {
		self.value_changed.add(callback)
	}

	/// Revokes every handle issued by this cell while it is still readable.
	pub fn close(&self) {
		self.changed.close();
		self.value_changed.close();
	}

	pub fn expr(self: &Rc<Self>) -> Expr<T> {
		let weak = Rc::downgrade(self);
		let mut expr = Expr::from_fn(move || weak.upgrade().map(|body| body.get()));
		expr.depends_on(Dependency::new(Rc::downgrade(self) as Weak<dyn Source>));
		expr
	}
}

impl<T> Source for CellBody<T>
where
	T: Clone + 'static,
{
	fn subscribe(&self, on_change: Box<dyn Fn()>, on_close: Box<dyn FnOnce()>) -> Handle {
		self.changed.add_with_release(on_change, on_close)
	}
}

impl<T> std::fmt::Debug for CellBody<T>
where
	T: std::fmt::Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CellBody")
			.field("value", &self.value.borrow())
			.field("binding", &self.binding.borrow())
			.field("listeners", &self.changed.len())
			.finish()
	}
}
