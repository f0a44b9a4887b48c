#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Build a [`RawRef`](crate::RawRef) from mention notation.
///
/// ```text
/// raw_ref!(he, "@רש\"י @פרק יום טוב @בביצה")
/// raw_ref!(en, "@Exodus #9:#6~,#5")
/// ```
///
/// Panics on malformed notation; meant for tests and fixtures.
#[macro_export]
macro_rules! raw_ref {
    (he, $notation:expr) => {
        $crate::RawRef::from_notation($crate::Lang::He, $notation).expect("valid mention notation")
    };
    (en, $notation:expr) => {
        $crate::RawRef::from_notation($crate::Lang::En, $notation).expect("valid mention notation")
    };
}
