/// Left-pad `n` with zeros to the number of decimal digits in `n_tot`, e.g.
/// for numbering output files `003` of `100`. Numbers already as long as
/// `n_tot` are returned unpadded.
pub fn zeropad(n: u32, n_tot: u32) -> String {
    let width = n_tot.to_string().len();
    format!("{n:0>width$}")
}
