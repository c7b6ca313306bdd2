use std::cell::{Cell, RefCell};
use std::fmt::Debug;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

/// Channel without payload, fired when a cell changes.
pub type ChangeChannel = Channel<dyn Fn()>;

/// Channel carrying the previous and the current value of a cell.
pub type ValueChannel<T> = Channel<dyn Fn(&T, &T)>;

/// An ordered registry of callbacks.
///
/// Every registration yields a [`Handle`]. Revoking the handle removes the
/// callback and runs its release callback, exactly once. Dropping (or
/// closing) the channel revokes every handle still registered.
pub struct Channel<F: ?Sized + 'static> {
	registry: Rc<RefCell<Registry<F>>>,
}

struct Registry<F: ?Sized> {
	next: u64,
	slots: Vec<Rc<Slot<F>>>,
}

struct Slot<F: ?Sized> {
	id: u64,
	live: Cell<bool>,
	release: Cell<Option<Box<dyn FnOnce()>>>,
	callback: Box<F>,
}

impl<F: ?Sized> Slot<F> {
	fn retire(&self) -> Option<Box<dyn FnOnce()>> {
		self.live.set(false);
		self.release.take()
	}
}

trait Revoke {
	fn revoke(&self, id: u64);
	fn contains(&self, id: u64) -> bool;
}

impl<F: ?Sized> Revoke for RefCell<Registry<F>> {
	fn revoke(&self, id: u64) {
		let slot = {
			let mut registry = self.borrow_mut();
			match registry.slots.iter().position(|slot| slot.id == id) {
				Some(index) => registry.slots.remove(index),
				None => return,
			}
		};

		// The callback may own guards into this very channel,
		// so the slot is dropped only after the borrow ends.
		if let Some(release) = slot.retire() {
			release();
		}
	}

	fn contains(&self, id: u64) -> bool {
		self.borrow().slots.iter().any(|slot| slot.id == id)
	}
}

impl<F: ?Sized + 'static> Default for Channel<F> {
	fn default() -> Self {
		Self::new()
	}
}

impl<F: ?Sized + 'static> Channel<F> {
	pub fn new() -> Self {
		Channel {
			registry: Rc::new(RefCell::new(Registry {
				next: 0,
				slots: Vec::new(),
			})),
		}
	}

	/// Registers `callback` until the returned handle is revoked
	/// or the channel goes away.
	pub fn add(&self, callback: Box<F>) -> Handle {
		self.insert(callback, None)
	}

	/// Same as [`Channel::add`], but `release` runs once the
	/// registration ends, whatever ends it.
	pub fn add_with_release(&self, callback: Box<F>, release: impl FnOnce() + 'static) -> Handle {
		self.insert(callback, Some(Box::new(release)))
	}

	fn insert(&self, callback: Box<F>, release: Option<Box<dyn FnOnce()>>) -> Handle {
		let mut registry = self.registry.borrow_mut();
		let id = registry.next;
		registry.next += 1;
		registry.slots.push(Rc::new(Slot {
			id,
			live: Cell::new(true),
			release: Cell::new(release),
			callback,
		}));

		let weak = Rc::downgrade(&self.registry);
		Handle {
			registry: weak as Weak<dyn Revoke>,
			id,
		}
	}

	pub fn revoke(&self, handle: &Handle) {
		handle.revoke()
	}

	/// Calls every registered callback through `call`, in registration order.
	///
	/// The set of callbacks is captured before the first call: registrations made
	/// while firing wait for the next pass, revocations take effect immediately.
	pub fn fire_with(&self, mut call: impl FnMut(&F)) {
		let snapshot: SmallVec<[Rc<Slot<F>>; 8]> =
			self.registry.borrow().slots.iter().cloned().collect();

		for slot in snapshot {
			if slot.live.get() {
				call(&*slot.callback);
			}
		}
	}

	pub fn len(&self) -> usize {
		self.registry.borrow().slots.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Revokes every registration, running release callbacks in registration order.
	pub fn close(&self) {
		let slots = std::mem::take(&mut self.registry.borrow_mut().slots);
		if slots.is_empty() {
			return;
		}

		tracing::debug!(count = slots.len(), "closing channel");
		for slot in slots {
			if let Some(release) = slot.retire() {
				release();
			}
		}
	}
}

impl Channel<dyn Fn()> {
	pub fn fire(&self) {
		self.fire_with(|callback| callback())
	}
}

impl<T: 'static> Channel<dyn Fn(&T, &T)> {
	pub fn fire(&self, old: &T, new: &T) {
		self.fire_with(|callback| callback(old, new))
	}
}

impl<F: ?Sized + 'static> Drop for Channel<F> {
	fn drop(&mut self) {
		self.close()
	}
}

impl<F: ?Sized + 'static> Debug for Channel<F> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Channel").field("len", &self.len()).finish()
	}
}

/// A revocable capability for one registration on a [`Channel`].
///
/// A handle does not own its callback: dropping it leaves the
/// registration in place. Use [`Handle::guard`] for that.
#[derive(Clone)]
pub struct Handle {
	registry: Weak<dyn Revoke>,
	id: u64,
}

impl Handle {
	/// Ends the registration. Calling this more than once does nothing.
	pub fn revoke(&self) {
		if let Some(registry) = self.registry.upgrade() {
			registry.revoke(self.id)
		}
	}

	pub fn is_active(&self) -> bool {
		self.registry
			.upgrade()
			.map_or(false, |registry| registry.contains(self.id))
	}

	#[must_use]
	pub fn guard(self) -> HandleGuard {
		HandleGuard {
			handle: self,
			armed: true,
		}
	}
}

impl Debug for Handle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Handle")
			.field("id", &self.id)
			.field("active", &self.is_active())
			.finish()
	}
}

/// Revokes its handle when dropped.
#[derive(Debug)]
pub struct HandleGuard {
	handle: Handle,
	armed: bool,
}

impl HandleGuard {
	/// Gives the handle back without revoking it.
	pub fn disarm(mut self) -> Handle {
		self.armed = false;
		self.handle.clone()
	}

	pub fn is_active(&self) -> bool {
		self.handle.is_active()
	}
}

impl From<Handle> for HandleGuard {
	fn from(handle: Handle) -> Self {
		handle.guard()
	}
}

impl Drop for HandleGuard {
	fn drop(&mut self) {
		if self.armed {
			self.handle.revoke()
		}
	}
}
