/// formats `data` as a contiguous string of upper case hex pairs
pub fn hex_bytes(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02X}", b)).collect()
}
