use crate::dependencies::Dependencies;
use crate::expr::IntoExpr;

/// A tuple of cells or expressions a combinator is applied to.
///
/// Implemented for tuples of up to eight elements, each being anything that
/// converts into an expression (`&Var`, `&Computed`, `Expr`, constants).
/// The combinator then receives the tuple of their values.
pub trait Inputs {
	type Values: 'static;

	/// Reader for the current values, plus the cells read, in order.
	fn into_parts(self) -> (Box<dyn Fn() -> Option<Self::Values>>, Dependencies);
}

impl Inputs for () {
	type Values = ();

	fn into_parts(self) -> (Box<dyn Fn() -> Option<()>>, Dependencies) {
		(Box::new(|| Some(())), Dependencies::new())
	}
}

macro_rules! tuple_inputs {
	($($idx:tt $name:ident),+) => {
		impl<$($name),+> Inputs for ($($name,)+)
		where
			$($name: IntoExpr,)+
		{
			type Values = ($($name::Value,)+);

			fn into_parts(self) -> (Box<dyn Fn() -> Option<Self::Values>>, Dependencies) {
				let exprs = ($(self.$idx.into_expr(),)+);

				let mut dependencies = Dependencies::new();
				$(dependencies.append(exprs.$idx.dependencies().clone());)+

				let read = move || Some(($(exprs.$idx.evaluate()?,)+));
				(Box::new(read), dependencies)
			}
		}
	};
}

tuple_inputs!(0 A);
tuple_inputs!(0 A, 1 B);
tuple_inputs!(0 A, 1 B, 2 C);
tuple_inputs!(0 A, 1 B, 2 C, 3 D);
tuple_inputs!(0 A, 1 B, 2 C, 3 D, 4 E);
tuple_inputs!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F);
tuple_inputs!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G);
tuple_inputs!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H);
