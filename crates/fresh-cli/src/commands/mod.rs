pub mod attachment;
pub mod dispatch;
pub mod register;
pub mod table;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_support;
