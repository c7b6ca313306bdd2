use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::rc::Weak;

/// A weak pointer compared and hashed by the address it points to.
pub struct WeakAddr<T: ?Sized> {
	ptr: Weak<T>,
}

impl<T: ?Sized> WeakAddr<T> {
	pub fn new(ptr: Weak<T>) -> Self {
		WeakAddr { ptr }
	}

	/// Address without metadata, so two trait objects built from
	/// the same allocation compare equal.
	pub fn addr(&self) -> usize {
		Weak::as_ptr(&self.ptr) as *const () as usize
	}
}

impl<T: ?Sized> Clone for WeakAddr<T> {
	fn clone(&self) -> Self {
		WeakAddr {
			ptr: self.ptr.clone(),
		}
	}
}

impl<T: ?Sized> Deref for WeakAddr<T> {
	type Target = Weak<T>;
	fn deref(&self) -> &Self::Target {
		&self.ptr
	}
}

impl<T: ?Sized> PartialEq for WeakAddr<T> {
	fn eq(&self, other: &Self) -> bool {
		self.addr() == other.addr()
	}
}

impl<T: ?Sized> Eq for WeakAddr<T> {}

impl<T: ?Sized> Hash for WeakAddr<T> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		state.write_usize(self.addr())
	}
}
