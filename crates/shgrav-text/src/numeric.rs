use std::num::ParseFloatError;

/// Parses a float that may use Fortran `d`/`D` exponent markers (`1.0D-05`).
pub fn parse_fortran_f64(field: &str) -> Result<f64, ParseFloatError> {
    if field.contains(['d', 'D']) {
        field.replace(['d', 'D'], "e").parse()
    } else {
        field.parse()
    }
}
