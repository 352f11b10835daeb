use nom::bytes::complete::take;
use nom::IResult;

/// Parse a big-endian 48 bit unsigned integer.
pub fn be_u48(input: &[u8]) -> IResult<&[u8], u64> {
    let (input, bytes) = take(6_usize)(input)?;
    let value = bytes
        .iter()
        .fold(0_u64, |acc, b| (acc << 8) | u64::from(*b));
    Ok((input, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_u48() {
        let (rest, v) = be_u48(&[0, 0, 0, 0, 1, 0, 9]).unwrap();
        assert_eq!(v, 256);
        assert_eq!(rest, &[9]);
    }

    #[test]
    fn short_input() {
        assert!(be_u48(&[1, 2, 3]).is_err());
    }
}
