use std::cell::Cell;
use std::rc::Rc;

use bindcell::macros::enclose;
use bindcell::{computed, Computed, Expr, Observable, Var};
use mockall::predicate::eq;

mod mock;

use mock::Spy;

fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_max_level(tracing::Level::TRACE)
		.try_init();
}

#[test]
fn square() {
	init_tracing();

	let a = Var::new(3i32);
	let s = Computed::from_expr(&a * &a);
	assert_eq!(s.get(), 9);

	a.set(5);
	assert_eq!(s.get(), 25);
}

#[test]
fn hypotenuse() {
	init_tracing();

	let a = Var::new(1.0f64);
	let b = Var::new(1.0f64);

	let h = Computed::from_expr(&a * &a + &b * &b);
	let c = Computed::from_expr(&b / h.map(f64::sqrt));

	a.set(3.0);
	b.set(4.0);

	assert_eq!(h.get(), 25.0);
	assert_eq!(c.get(), 0.8);
}

#[test]
fn two_hops() {
	init_tracing();

	let a = Var::new(2);
	let b = Computed::bound((&a,), |(a,)| a + 1);
	let c = Computed::bound((&b,), |(b,)| b + 2);
	assert_eq!(c.get(), 5);

	a.set(4);
	assert_eq!(c.get(), 7);
}

#[test]
fn last_set_wins() {
	let a = Var::new(0);
	for value in [4, 8, 15, 16, 23, 42] {
		a.set(value);
	}

	assert_eq!(a.get(), 42);
}

#[test]
fn change_listener_sees_new_value() {
	let a = Var::new(3i64);

	let mock = mock::SharedMock::new();
	let reader = a.expr();
	a.on_change(enclose!((mock) move || {
		mock.get().changed(reader.evaluate().unwrap_or_default());
	}));

	mock.get().expect_changed().with(eq(5)).times(1).return_const(());
	a.set(5);
	mock.get().checkpoint();

	mock.get().expect_changed().with(eq(6)).times(1).return_const(());
	a.update(|value| *value += 1);
	mock.get().checkpoint();
}

#[test]
fn change_fires_before_value() {
	let a = Var::new(1i64);
	let mock = mock::SharedMock::new();

	a.on_value(enclose!((mock) move |old: &i64, new: &i64| mock.get().value(*old, *new)));
	a.on_change(enclose!((mock) move || mock.get().changed(0)));

	let mut seq = mockall::Sequence::new();
	mock.get()
		.expect_changed()
		.times(1)
		.in_sequence(&mut seq)
		.return_const(());
	mock.get()
		.expect_value()
		.with(eq(1), eq(2))
		.times(1)
		.in_sequence(&mut seq)
		.return_const(());

	a.set(2);
	mock.get().checkpoint();
}

#[test]
fn value_listener_telescopes() {
	let a = Var::new(3i64);

	let total = Rc::new(Cell::new(0i64));
	let times = Rc::new(Cell::new(0));
	a.on_value(enclose!((total, times) move |old: &i64, new: &i64| {
		total.set(total.get() + new - old);
		times.set(times.get() + 1);
	}));

	for value in [5, 3, 10, -2, 7] {
		a.set(value);
	}

	assert_eq!(total.get(), 7 - 3);
	assert_eq!(times.get(), 5);
}

#[test]
fn revoked_value_listener() {
	let a = Var::new(3);
	let total = Rc::new(Cell::new(0));

	let first = a.on_value(enclose!((total) move |_: &i32, _: &i32| total.set(total.get() + 1)));
	a.on_value(enclose!((total) move |_: &i32, _: &i32| total.set(total.get() + 2)));

	a.set(5);
	assert_eq!(total.get(), 3);

	first.revoke();
	a.set(3);
	assert_eq!(total.get(), 5);
}

#[test]
fn derived_value_listener() {
	let a = Var::new(2i64);
	let doubled = Computed::bound((&a,), |(a,)| a * 2);
	assert_eq!(doubled.get(), 4);

	let mock = mock::SharedMock::new();
	doubled.on_value(enclose!((mock) move |old: &i64, new: &i64| mock.get().value(*old, *new)));

	// Nothing is recomputed until the derived cell is read.
	mock.get().expect_value().times(0).return_const(());
	a.set(3);
	a.set(4);
	mock.get().checkpoint();

	mock.get()
		.expect_value()
		.with(eq(4), eq(8))
		.times(1)
		.return_const(());
	assert_eq!(doubled.get(), 8);
	mock.get().checkpoint();
}

#[test]
fn expression_evaluates_directly() {
	let opposite = Var::new(3i32);
	let adjacent = Var::new(5i32);

	let squared = (&opposite * &opposite) + (&adjacent * &adjacent);
	assert_eq!(squared.evaluate(), Some(34));

	opposite.set(5);
	assert_eq!(squared.evaluate(), Some(50));
}

#[test]
fn expression_inputs_concatenate() {
	let a = Var::new(1i32);
	let b = Var::new(2i32);

	let expr = &a * &a + &b * 3i32;
	assert_eq!(expr.dependencies().len(), 3);
	assert_eq!(expr.dependencies().distinct().count(), 2);

	let constant = Expr::constant(10i32) - 4i32;
	assert!(constant.dependencies().is_empty());
	assert_eq!(constant.evaluate(), Some(6));
}

#[test]
fn operators() {
	let a = Var::new(7i32);
	let b = Computed::new(2i32);

	assert_eq!((&a - &b).evaluate(), Some(5));
	assert_eq!((&a % 4i32).evaluate(), Some(3));
	assert_eq!((-&a).evaluate(), Some(-7));
	assert_eq!((Expr::constant(10i32) - &a).evaluate(), Some(3));
	assert_eq!(a.map(|a| a * 3).combine(&b, |l, r| l / r).evaluate(), Some(10));
}

#[test]
fn computed_macro() {
	let width = Var::new(3);
	let height = Var::new(4);
	let area = computed!(width, height => |w, h| w * h);
	assert_eq!(area.get(), 12);

	width.set(5);
	assert_eq!(area.get(), 20);
}

#[test]
fn mirror() {
	let a = Var::new(2);
	let copy = Computed::mirror(&a);

	a.set(4);
	assert_eq!(copy.get(), 4);
	assert_eq!(Observable::get(&copy), 4);
}

#[test]
fn toggle() {
	let flag = Var::new(false);
	let label = flag.map(|on| if on { "on" } else { "off" });

	flag.toggle();
	assert_eq!(label.evaluate(), Some("on"));
}
