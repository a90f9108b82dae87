//! Lazy pull-based dataflow wires.
//!
//! A [`Wire`] is a typed value source: reading it invokes a stored provider
//! function and returns the result. Nothing is cached — the provider may
//! read live external state (a sensor, a device register), so two reads may
//! legitimately differ, and a combined wire always reflects its operands'
//! current values on the next read.
//!
//! Arithmetic between wires (and between a wire and a scalar) builds a new
//! wire whose provider evaluates both operands lazily at read time.
//! Division by zero and overflow follow the host numeric semantics of `T`
//! at the moment [`Wire::value`] is called — an integer wire dividing by a
//! zero-valued wire panics on read, a float wire yields an infinity.

use std::ops::{Add, Div, Mul, Sub};
use std::rc::Rc;

/// Typed, lazily-evaluated value source.
///
/// Cloning a wire is cheap and shares the provider. Assigning a new value
/// or provider replaces the provider wholesale; combined wires built
/// earlier keep the provider they captured.
pub struct Wire<T> {
    provider: Rc<dyn Fn() -> T>,
}

impl<T> Clone for Wire<T> {
    fn clone(&self) -> Self {
        Self {
            provider: Rc::clone(&self.provider),
        }
    }
}

impl<T: 'static> Wire<T> {
    /// Wire backed by a provider function, invoked on every read.
    pub fn new(provider: impl Fn() -> T + 'static) -> Self {
        Self {
            provider: Rc::new(provider),
        }
    }

    /// Current value on the wire.
    #[inline]
    pub fn value(&self) -> T {
        (self.provider)()
    }

    /// Replace the provider wholesale.
    pub fn set_provider(&mut self, provider: impl Fn() -> T + 'static) {
        self.provider = Rc::new(provider);
    }

    /// Derived wire applying `f` to every read.
    pub fn map<U: 'static>(&self, f: impl Fn(T) -> U + 'static) -> Wire<U> {
        let source = Rc::clone(&self.provider);
        Wire::new(move || f(source()))
    }

    /// Coercing constructor: a wire of `T` reading a wire of `V`.
    ///
    /// For conversions without a `From` impl (e.g. `f64` to `i32`), use
    /// [`Wire::map`] with an explicit cast.
    pub fn converted<V: 'static>(source: &Wire<V>) -> Self
    where
        T: From<V>,
    {
        source.map(T::from)
    }
}

impl<T: Clone + 'static> Wire<T> {
    /// Wire that always yields `value`.
    pub fn constant(value: T) -> Self {
        Self::new(move || value.clone())
    }

    /// Replace the provider with a constant.
    pub fn set_value(&mut self, value: T) {
        self.set_provider(move || value.clone());
    }
}

impl<T: Clone + 'static> From<T> for Wire<T> {
    fn from(value: T) -> Self {
        Wire::constant(value)
    }
}

// ─── Arithmetic Combinators ─────────────────────────────────────────

macro_rules! wire_binop {
    ($trait:ident, $method:ident) => {
        /// Wire ⊕ Wire: both operands evaluate lazily on every read.
        impl<T> $trait for Wire<T>
        where
            T: $trait<Output = T> + 'static,
        {
            type Output = Wire<T>;

            fn $method(self, rhs: Wire<T>) -> Wire<T> {
                Wire::new(move || T::$method(self.value(), rhs.value()))
            }
        }

        /// Wire ⊕ scalar.
        impl<T> $trait<T> for Wire<T>
        where
            T: $trait<Output = T> + Clone + 'static,
        {
            type Output = Wire<T>;

            fn $method(self, rhs: T) -> Wire<T> {
                Wire::new(move || T::$method(self.value(), rhs.clone()))
            }
        }
    };
}

wire_binop!(Add, add);
wire_binop!(Sub, sub);
wire_binop!(Mul, mul);
wire_binop!(Div, div);

/// scalar ⊕ Wire, for the concrete numeric alias types. Coherence rules out
/// the generic form, so the left-scalar direction exists only for `f64` and
/// `i32`.
macro_rules! scalar_wire_binop {
    ($scalar:ty) => {
        impl Add<Wire<$scalar>> for $scalar {
            type Output = Wire<$scalar>;

            fn add(self, rhs: Wire<$scalar>) -> Wire<$scalar> {
                Wire::new(move || self + rhs.value())
            }
        }

        impl Sub<Wire<$scalar>> for $scalar {
            type Output = Wire<$scalar>;

            fn sub(self, rhs: Wire<$scalar>) -> Wire<$scalar> {
                Wire::new(move || self - rhs.value())
            }
        }

        impl Mul<Wire<$scalar>> for $scalar {
            type Output = Wire<$scalar>;

            fn mul(self, rhs: Wire<$scalar>) -> Wire<$scalar> {
                Wire::new(move || self * rhs.value())
            }
        }

        impl Div<Wire<$scalar>> for $scalar {
            type Output = Wire<$scalar>;

            fn div(self, rhs: Wire<$scalar>) -> Wire<$scalar> {
                Wire::new(move || self / rhs.value())
            }
        }
    };
}

scalar_wire_binop!(f64);
scalar_wire_binop!(i32);

// ─── Aliases ────────────────────────────────────────────────────────

/// Floating-point wire (sensor readings, control errors, motor power).
pub type FloatWire = Wire<f64>;
/// Integer wire (encoder counts, raw sensor values).
pub type IntWire = Wire<i32>;
/// Boolean wire (touch sensors, gate flags).
pub type BoolWire = Wire<bool>;
/// Text wire (status labels).
pub type TextWire = Wire<String>;

// ─── Tests ──────────────────────────────────────────────────────────
