use galthumb::{contains_dot_file, sanitize_path};

#[test]
fn test_contains_dot_file() {
    let cases = [
        (".", true),
        ("inner.dot", false),
        (".starting", true),
        ("/folder/./subfolder", true),
        ("/root/.hidden/subfolder", true),
        ("home/not.hidden/subfolder", false),
    ];
    for (path, expected) in cases {
        assert_eq!(contains_dot_file(path), expected, "contains_dot_file({:?})", path);
    }
}

#[test]
fn test_sanitize_path() {
    let cases = [
        ("", "."),
        ("/", "."),
        ("a/b/c.jpg", "a/b/c.jpg"),
        ("/a/b.jpg", "a/b.jpg"),
        ("../a.jpg", "a.jpg"),
        ("../../etc/passwd", "etc/passwd"),
        ("a/../../b.jpg", "b.jpg"),
        ("a//b/./c.jpg", "a/b/c.jpg"),
        ("a/b/../c.jpg", "a/c.jpg"),
        ("..", "."),
    ];
    for (input, expected) in cases {
        assert_eq!(sanitize_path(input), expected, "sanitize_path({:?})", input);
    }
}
