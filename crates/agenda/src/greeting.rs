/// Header text for the agenda, chosen by local hour of day.
///
/// Hours past 23 fall through to the evening greeting.
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    }
}
