use std::cell::Cell;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::channel::HandleGuard;
use crate::expr::Expr;

/// The live link between a derived value and the cells it is computed from.
///
/// A binding is lazy: every upstream change flips it to invalid and calls
/// `on_invalidate`, recomputation is left to whoever owns it.
/// `on_close` runs when any upstream cell is destroyed while subscribed.
pub struct Binding<T> {
	state: Option<Rc<BindingState<T>>>,
	subscriptions: SmallVec<[HandleGuard; 4]>,
	on_invalidate: Rc<dyn Fn()>,
	on_close: Rc<dyn Fn()>,
}

struct BindingState<T> {
	eval: Rc<dyn Fn() -> Option<T>>,
	valid: Cell<bool>,
}

impl<T: 'static> Default for Binding<T> {
	fn default() -> Self {
		Binding::new(|| {}, || {})
	}
}

impl<T: 'static> Binding<T> {
	pub fn new(on_invalidate: impl Fn() + 'static, on_close: impl Fn() + 'static) -> Self {
		Binding {
			state: None,
			subscriptions: SmallVec::new(),
			on_invalidate: Rc::new(on_invalidate),
			on_close: Rc::new(on_close),
		}
	}

	/// Drops the current inputs and binds to the ones of `expr`.
	///
	/// Each distinct cell is subscribed once, whatever the number of times
	/// it appears in the expression. The binding starts out invalid.
	pub fn reset(&mut self, expr: Expr<T>) {
		self.unbind();

		let (eval, dependencies) = expr.into_parts();
		let state = Rc::new(BindingState {
			eval,
			valid: Cell::new(false),
		});

		for dependency in dependencies.distinct() {
			let on_change = {
				let state = Rc::downgrade(&state);
				let on_invalidate = self.on_invalidate.clone();
				Box::new(move || {
					let Some(state) = state.upgrade() else {
						return;
					};

					state.valid.set(false);
					on_invalidate();
				})
			};

			let on_close = {
				let state = Rc::downgrade(&state);
				let on_close = self.on_close.clone();
				Box::new(move || {
					if state.upgrade().is_some() {
						on_close();
					}
				})
			};

			match dependency.subscribe(on_change, on_close) {
				Some(handle) => self.subscriptions.push(handle.guard()),
				None => tracing::warn!(?dependency, "binding to a cell that no longer exists"),
			}
		}

		tracing::trace!(subscriptions = self.subscriptions.len(), "binding reset");
		self.state = Some(state);
	}

	/// Revokes every subscription and forgets the combinator.
	pub fn unbind(&mut self) {
		// The state goes first so that release callbacks
		// triggered below see an inert binding.
		if self.state.take().is_some() {
			tracing::trace!(subscriptions = self.subscriptions.len(), "binding cleared");
		}
		self.subscriptions.clear();
	}

	pub fn is_active(&self) -> bool {
		self.state.is_some()
	}

	/// Meaningless while inactive, and reported as `false`.
	pub fn is_valid(&self) -> bool {
		self.state.as_ref().map_or(false, |state| state.valid.get())
	}

	pub fn mark_valid(&self) {
		if let Some(state) = &self.state {
			state.valid.set(true)
		}
	}

	/// Number of upstream cells this binding listens to.
	pub fn subscriptions(&self) -> usize {
		self.subscriptions.len()
	}

	/// Runs the combinator over the current input values.
	///
	/// `None` if the binding is inactive, or if one of its inputs is gone.
	pub fn evaluate(&self) -> Option<T> {
		self.state.as_ref().and_then(|state| (state.eval)())
	}

	pub(crate) fn evaluator(&self) -> Option<Rc<dyn Fn() -> Option<T>>> {
		self.state.as_ref().map(|state| state.eval.clone())
	}
}

impl<T> Drop for Binding<T> {
	fn drop(&mut self) {
		self.state = None;
		self.subscriptions.clear();
	}
}

impl<T> std::fmt::Debug for Binding<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Binding")
			.field("active", &self.state.is_some())
			.field("subscriptions", &self.subscriptions.len())
			.finish()
	}
}
