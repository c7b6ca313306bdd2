use std::rc::Weak;

use fxhash::FxHashSet;
use smallvec::SmallVec;

use crate::addr::WeakAddr;
use crate::channel::Handle;

/// Something a binding can subscribe to.
pub(crate) trait Source: 'static {
	/// Registers `on_change` on the change channel. `on_close` runs when the
	/// registration ends, including when the source itself is destroyed.
	fn subscribe(&self, on_change: Box<dyn Fn()>, on_close: Box<dyn FnOnce()>) -> Handle;
}

/// A non-owning reference to an upstream cell.
#[derive(Clone)]
pub struct Dependency {
	source: WeakAddr<dyn Source>,
}

impl Dependency {
	pub(crate) fn new(source: Weak<dyn Source>) -> Self {
		Dependency {
			source: WeakAddr::new(source),
		}
	}

	/// Whether the upstream cell still exists.
	pub fn is_alive(&self) -> bool {
		self.source.strong_count() > 0
	}

	pub(crate) fn subscribe(&self, on_change: Box<dyn Fn()>, on_close: Box<dyn FnOnce()>) -> Option<Handle> {
		self.source
			.upgrade()
			.map(|source| source.subscribe(on_change, on_close))
	}
}

impl std::fmt::Debug for Dependency {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Dependency")
			.field("addr", &format_args!("{:#x}", self.source.addr()))
			.field("alive", &self.is_alive())
			.finish()
	}
}

/// Ordered list of the cells an expression reads.
///
/// Duplicates are kept, since the list mirrors the input tuple;
/// [`Dependencies::distinct`] is what gets subscribed.
#[derive(Clone, Default, Debug)]
pub struct Dependencies {
	list: SmallVec<[Dependency; 4]>,
}

impl Dependencies {
	pub fn new() -> Self {
		Self {
			list: SmallVec::new(),
		}
	}

	pub fn push(&mut self, dependency: Dependency) {
		self.list.push(dependency);
	}

	/// Appends `other` after the current entries.
	pub fn append(&mut self, other: Dependencies) {
		self.list.extend(other.list);
	}

	pub fn len(&self) -> usize {
		self.list.len()
	}

	pub fn is_empty(&self) -> bool {
		self.list.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Dependency> {
		self.list.iter()
	}

	/// Every cell once, in order of first occurrence.
	pub fn distinct(&self) -> impl Iterator<Item = &Dependency> {
		let mut seen = FxHashSet::default();
		self.list
			.iter()
			.filter(move |dependency| seen.insert(dependency.source.clone()))
	}
}
