//! Arithmetic operators building expressions.
//!
//! `&a * &a + &b * &b` composes into a single [`Expr`] reading `a` twice and
//! `b` twice; binding it subscribes to each cell once.

use std::ops::{Add, Div, Mul, Neg, Rem, Sub};

use crate::expr::IntoExpr;
use crate::{Computed, Expr, Var};

macro_rules! binary_ops {
	($($op:ident $method:ident),* $(,)?) => {
		$(
			impl<T, R> $op<R> for Expr<T>
			where
				T: $op<R::Value> + 'static,
				R: IntoExpr,
				<T as $op<R::Value>>::Output: 'static,
			{
				type Output = Expr<<T as $op<R::Value>>::Output>;

				fn $method(self, rhs: R) -> Self::Output {
					self.combine(rhs, <T as $op<R::Value>>::$method)
				}
			}

			impl<'a, T, R> $op<R> for &'a Expr<T>
			where
				T: $op<R::Value> + 'static,
				R: IntoExpr,
				<T as $op<R::Value>>::Output: 'static,
			{
				type Output = Expr<<T as $op<R::Value>>::Output>;

				fn $method(self, rhs: R) -> Self::Output {
					self.clone().combine(rhs, <T as $op<R::Value>>::$method)
				}
			}

			impl<'a, T, R> $op<R> for &'a Var<T>
			where
				T: Clone + $op<R::Value> + 'static,
				R: IntoExpr,
				<T as $op<R::Value>>::Output: 'static,
			{
				type Output = Expr<<T as $op<R::Value>>::Output>;

				fn $method(self, rhs: R) -> Self::Output {
					self.expr().combine(rhs, <T as $op<R::Value>>::$method)
				}
			}

			impl<'a, T, R> $op<R> for &'a Computed<T>
			where
				T: Clone + $op<R::Value> + 'static,
				R: IntoExpr,
				<T as $op<R::Value>>::Output: 'static,
			{
				type Output = Expr<<T as $op<R::Value>>::Output>;

				fn $method(self, rhs: R) -> Self::Output {
					self.expr().combine(rhs, <T as $op<R::Value>>::$method)
				}
			}
		)*
	};
}

binary_ops!(Add add, Sub sub, Mul mul, Div div, Rem rem);

impl<T> Neg for Expr<T>
where
	T: Neg + 'static,
	T::Output: 'static,
{
	type Output = Expr<T::Output>;

	fn neg(self) -> Self::Output {
		self.map(T::neg)
	}
}

impl<'a, T> Neg for &'a Var<T>
where
	T: Clone + Neg + 'static,
	T::Output: 'static,
{
	type Output = Expr<T::Output>;

	fn neg(self) -> Self::Output {
		self.expr().map(T::neg)
	}
}

impl<'a, T> Neg for &'a Computed<T>
where
	T: Clone + Neg + 'static,
	T::Output: 'static,
{
	type Output = Expr<T::Output>;

	fn neg(self) -> Self::Output {
		self.expr().map(T::neg)
	}
}
