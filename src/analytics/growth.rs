/// Period-over-period growth in percent.
///
/// A previous period of zero is special-cased: any growth from zero reads
/// as 100%, and zero-to-zero reads as 0%. Dashboards expect these exact
/// figures.
pub fn growth_rate(current: u64, previous: u64) -> f64 {
    if previous == 0 {
        if current > 0 {
            100.0
        } else {
            0.0
        }
    } else {
        (current as f64 - previous as f64) / previous as f64 * 100.0
    }
}
