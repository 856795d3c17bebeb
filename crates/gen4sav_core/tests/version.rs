use gen4sav_core::sav4::offsets::table_for;
use gen4sav_core::sav4::version::resolve;
use gen4sav_core::sav4::{BLOCK_STRIDE, FormatError, Resolution, SAVE_SIZE, SaveImage, Version};

fn with_marker(version: Version, copy: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; SAVE_SIZE];
    let marker = table_for(version).general_marker;
    let at = marker.offset + copy * BLOCK_STRIDE;
    bytes[at..at + 4].copy_from_slice(&marker.value.to_le_bytes());
    bytes
}

#[test]
fn blank_image_defaults_to_first_version() {
    let bytes = vec![0u8; SAVE_SIZE];
    assert_eq!(resolve(&bytes, None), Resolution::Blank(Version::DiamondPearl));

    let image = SaveImage::from_bytes(bytes, None).expect("blank image should open");
    assert_eq!(image.version(), Version::DiamondPearl);
    assert!(image.is_blank());
}

#[test]
fn footer_marker_identifies_each_version_in_either_copy() {
    for version in Version::ALL {
        for copy in 0..2 {
            let bytes = with_marker(version, copy);
            assert_eq!(resolve(&bytes, None), Resolution::Known(version), "{version} copy {copy}");
        }
    }
}

#[test]
fn conflicting_markers_are_unresolved() {
    let mut bytes = with_marker(Version::DiamondPearl, 0);
    let pt = table_for(Version::Platinum).general_marker;
    bytes[pt.offset..pt.offset + 4].copy_from_slice(&pt.value.to_le_bytes());

    assert_eq!(resolve(&bytes, None), Resolution::Unresolved);
    let err = SaveImage::from_bytes(bytes, None).expect_err("ambiguous image must not open");
    assert_eq!(err, FormatError::UnresolvedVersion);
}

#[test]
fn unknown_nonzero_image_is_unresolved() {
    let mut bytes = vec![0u8; SAVE_SIZE];
    bytes[0x10] = 0x5A;
    assert_eq!(resolve(&bytes, None), Resolution::Unresolved);
    assert!(matches!(
        SaveImage::from_bytes(bytes, None),
        Err(FormatError::UnresolvedVersion)
    ));
}

#[test]
fn override_wins_over_markers() {
    let bytes = with_marker(Version::DiamondPearl, 0);
    assert_eq!(
        resolve(&bytes, Some(Version::HeartGoldSoulSilver)),
        Resolution::Known(Version::HeartGoldSoulSilver)
    );
    let image = SaveImage::from_bytes(bytes, Some(Version::Platinum)).expect("override");
    assert_eq!(image.version(), Version::Platinum);
}

#[test]
fn wrong_length_is_rejected() {
    let bytes = vec![0u8; SAVE_SIZE - 1];
    assert_eq!(resolve(&bytes, None), Resolution::Unresolved);
    assert_eq!(
        SaveImage::from_bytes(bytes, Some(Version::Platinum)).expect_err("short image"),
        FormatError::InvalidLength {
            expected: SAVE_SIZE,
            actual: SAVE_SIZE - 1
        }
    );
}

#[test]
fn version_names_round_trip_through_from_str() {
    for version in Version::ALL {
        assert_eq!(version.as_str().parse::<Version>(), Ok(version));
        assert_eq!(Version::from_tag(version.tag()), Some(version));
    }
    assert!("bw".parse::<Version>().is_err());
}
