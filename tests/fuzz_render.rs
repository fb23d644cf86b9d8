//! Lightweight fuzz-style tests; no external fuzz harness required.

use moniwiki::{render, render_markdown, transcode};

#[derive(Clone)]
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        // xorshift64*
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    fn gen_range(&mut self, hi: usize) -> usize {
        (self.next_u64() as usize) % hi
    }
}

fn gen_moniwiki_like(rng: &mut XorShift64, len: usize) -> String {
    // restrict to a markup-relevant alphabet, so we hit interesting scanning paths.
    // multi-byte characters are included to catch slicing on non-boundaries.
    const DICT: &[&str] = &[
        "a", "B", "1", " ", " ", "\n", "\n", "\t", "[", "]", "[[", "]]", "{{{", "}}}", "\"", "'",
        "''", "'''", "--", "-->", "=", "== ", " ==", "*", "1.", "a.", "> ", "#", "%", "%2", "|",
        "http://", "https://x.y", "한", "é", "\r",
    ];
    let mut s = String::with_capacity(len * 2);
    for _ in 0..len {
        s.push_str(DICT[rng.gen_range(DICT.len())]);
    }
    s
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[test]
fn fuzz_render_random_inputs_total_and_balanced() {
    // keep cases bounded so this doesn't slow down normal `cargo test` too much.
    let mut rng = XorShift64::new(0xC0FFEE);
    let pages = ["a.md", "B.moniwiki", "Ba.md"];
    for _case in 0..2_000 {
        let len = rng.gen_range(400);
        let input = gen_moniwiki_like(&mut rng, len);

        let html = render(&input, &pages);
        assert_eq!(html, render(&input, &pages), "non-deterministic for {input:?}");

        // the alphabet has no `<`, so every tag in the output was written by the renderer.
        for tag in ["ul", "ol", "pre", "blockquote", "strong", "em", "del", "a"] {
            let open = count(&html, &format!("<{tag}>")) + count(&html, &format!("<{tag} "));
            let close = count(&html, &format!("</{tag}>"));
            assert_eq!(open, close, "unbalanced <{tag}> for {input:?}:\n{html}");
        }

        let md = transcode(&input);
        assert_eq!(count(&md, "```") % 2, 0, "unbalanced fence for {input:?}:\n{md}");
        assert!(md.is_empty() || md.ends_with('\n'));

        let _ = render_markdown(&md, &pages);
    }
}
