#![no_main]
use earlex::earley::{EarleyConfig, EarleyParser};
use earlex::grammar::GrammarBuilder;
use earlex::lexer::Token;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 256 {
        return;
    }

    // Ambiguous, left and right recursive, with an empty production
    let grammar = GrammarBuilder::new()
        .start("S")
        .rule("S", ["S", "S"])
        .rule("S", ["$open", "S", "$close"])
        .rule("S", ["$x"])
        .rule("S", ["A"])
        .rule("A", [] as [&str; 0])
        .rule("A", ["A", "$x"])
        .build()
        .unwrap();

    let tokens = data.iter().enumerate().map(|(i, byte)| {
        let kind = match byte % 4 {
            0 => "open",
            1 => "close",
            2 => "x",
            _ => "junk",
        };
        Token::new(1, i as u32 + 1, kind, kind, byte % 8 != 7)
    });

    let parser = EarleyParser::with_config(
        &grammar,
        EarleyConfig::new().with_max_alternatives(Some(2)),
    );
    if let Ok(forest) = parser.parse_tokens(tokens) {
        assert!(forest.tree_count() >= 1);
        assert!(forest.span.end <= data.len());
    }
});
