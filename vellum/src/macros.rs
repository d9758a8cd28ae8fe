#[cfg(feature = "tracing")]
macro_rules! vtrace {
    ($($tt:tt)*) => {
        tracing::trace!(target: "vellum", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! vtrace {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! vdebug {
    ($($tt:tt)*) => {
        tracing::debug!(target: "vellum", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! vdebug {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! vwarn {
    ($($tt:tt)*) => {
        tracing::warn!(target: "vellum", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! vwarn {
    ($($tt:tt)*) => {};
}

/// Implements the `core`/`core_mut`/`as_component_mut` accessors of [`crate::Component`] for a
/// struct.
///
/// Syntax:
///
/// ```text
/// impl_component_core!(self.pane.core);
/// ```
///
/// Expands inside an `impl Component for ...` block.
#[macro_export]
macro_rules! impl_component_core {
    ($self:ident . $($field:ident).+) => {
        fn core(&$self) -> &$crate::ComponentCore {
            &$self.$($field).+
        }

        fn core_mut(&mut $self) -> &mut $crate::ComponentCore {
            &mut $self.$($field).+
        }

        fn as_component_mut(&mut $self) -> &mut dyn $crate::Component {
            $self
        }
    };
}
