pub(crate) mod xlsx_store;
