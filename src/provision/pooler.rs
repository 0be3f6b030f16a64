/// Points a connection string at the pooled endpoint by appending `-pooler`
/// to everything before the first `.`.
///
/// The input is not validated; a string without a `.` simply gets the suffix
/// at the end.
pub fn with_pooler(connection_string: &str) -> String {
    match connection_string.split_once('.') {
        Some((first, rest)) => format!("{first}-pooler.{rest}"),
        None => format!("{connection_string}-pooler"),
    }
}
