pub(crate) mod use_debounced_search;

pub(crate) use use_debounced_search::use_debounced_search;
