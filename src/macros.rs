/// Step to the next field of a sentence, reading a missing field as an
/// empty one. Receivers routinely truncate sentences, so running out of
/// fields mid-walk is normal and must not abort the parse.
#[macro_export]
macro_rules! next_field {
    ($fields:expr) => {
        $fields.next().unwrap_or("")
    };
}
