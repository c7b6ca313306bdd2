pub use enclose::*;

/// Builds a bound [`Computed`](crate::Computed) from input cells and a closure
/// taking their values, in the same order.
///
/// ```
/// use bindcell::{computed, Var};
///
/// let width = Var::new(3);
/// let height = Var::new(4);
/// let area = computed!(width, height => |w, h| w * h);
/// assert_eq!(area.get(), 12);
/// ```
#[macro_export]
macro_rules! computed {
	($($input:expr),+ => |$($arg:pat_param),+| $($body:tt)*) => {
		$crate::Computed::bound(($(&$input,)+), move |($($arg,)+)| $($body)*)
	};
}
