extern crate std;

#[test]
fn key_bits() {
    let mut bits = [0; crate::KEY_BITS_SIZE];
    assert!(crate::add_key_bit(&mut bits, 0x06));
    assert!(crate::add_key_bit(&mut bits, 0x07));
    assert!(!crate::add_key_bit(&mut bits, 0x07));
    assert!(crate::add_key_bit(&mut bits, 0x08));
    assert!(crate::add_key_bit(&mut bits, 0xe7));
    assert_eq!(&bits[..3], &[0b1100_0000, 0x01, 0]);
    assert_eq!(bits[crate::KEY_BITS_SIZE - 4], 128);

    assert!(crate::del_key_bit(&mut bits, 0x07));
    assert_eq!(&bits[..3], &[0b0100_0000, 0x01, 0]);
    assert!(!crate::del_key_bit(&mut bits, 0x07));
}

#[test]
fn key_bits_short_slice() {
    let mut bits = [0; 2];
    assert!(crate::add_key_bit(&mut bits, 0x0f));
    assert!(!crate::add_key_bit(&mut bits, 0x10));
    assert_eq!(bits, [0, 0x80]);
}
