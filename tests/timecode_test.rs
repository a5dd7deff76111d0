use chrono::TimeDelta;
use galthumb::timecode::{format, parse, thumbnail_offset};

#[test]
fn test_parse() {
    let cases = [
        ("00:20:00", TimeDelta::minutes(20)),
        ("00:-20:00", TimeDelta::minutes(20)),
        ("", TimeDelta::zero()),
        ("totally:invalid:this:is", TimeDelta::zero()),
        ("-1:invalid:10", TimeDelta::hours(1) + TimeDelta::seconds(10)),
        ("01:30", TimeDelta::minutes(90)),
        ("1200:00:00", TimeDelta::hours(1200)),
    ];
    for (input, expected) in cases {
        assert_eq!(parse(input), expected, "parse({:?})", input);
    }
}

#[test]
fn test_format() {
    let cases = [
        (TimeDelta::zero(), "00:00:00"),
        (TimeDelta::hours(1), "01:00:00"),
        (TimeDelta::minutes(200), "03:20:00"),
        (
            TimeDelta::hours(23) + TimeDelta::minutes(59) + TimeDelta::seconds(59),
            "23:59:59",
        ),
        (TimeDelta::hours(1200), "1200:00:00"),
        (TimeDelta::hours(100) + TimeDelta::seconds(10), "100:00:10"),
        (TimeDelta::seconds(-30), "00:00:30"),
    ];
    for (input, expected) in cases {
        assert_eq!(format(input), expected, "format({:?})", input);
    }
}

#[test]
fn test_format_parse_is_stable() {
    assert_eq!(format(parse("00:20:00")), "00:20:00");
    assert_eq!(format(parse("12:34:56")), "12:34:56");
}

#[test]
fn test_parse_never_panics_on_huge_values() {
    assert_eq!(parse("99999999999999999999:00:00"), TimeDelta::zero());
    let _ = parse("9223372036854775807:9223372036854775807:9223372036854775807");
    let _ = parse("-9223372036854775808:0:0");
}

#[test]
fn test_thumbnail_offset_is_a_third() {
    assert_eq!(thumbnail_offset("01:30:00"), "00:30:00");
    assert_eq!(thumbnail_offset("00:00:10"), "00:00:03");
    assert_eq!(thumbnail_offset("garbage"), "00:00:00");
}
