//! Macros for defining kind enums.

/// Macro for defining a kind enum.
///
/// Variants are displayed and parsed by their names, ignoring ASCII case on
/// parsing.
///
/// # Example
///
/// ```rust
/// use common::define_kind;
///
/// define_kind! {
///     #[doc = "Way of meeting."]
///     enum Mode {
///         #[doc = "Over a video call."]
///         Online = 1,
///
///         #[doc = "In person."]
///         Offline = 2,
///     }
/// }
///
/// assert_eq!(Mode::ALL, &[Mode::Online, Mode::Offline]);
/// assert_eq!("offline".parse::<Mode>().unwrap(), Mode::Offline);
/// assert_eq!(Mode::Online.to_string(), "Online");
/// ```
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_kind {
    (
        #[doc = $doc:literal]
        enum $name:ident {
            $(
                #[doc = $variant_doc:literal]
                $variant:ident = $value:expr
            ),* $(,)?
        }
    ) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            $crate::private::strum::Display,
            $crate::private::strum::EnumString,
            Eq,
            Hash,
            PartialEq,
        )]
        #[doc = $doc]
        #[repr(u8)]
        #[strum(ascii_case_insensitive)]
        pub enum $name {
            $(
                 #[doc = $variant_doc]
                 $variant = $value,
            )*
        }

        impl $name {
            #[doc = ::core::concat!(
                "All [`", ::core::stringify!($name), "`] variants in their \
                 declaration order.",
            )]
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];
        }
    };
}
