use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use earlex::Pipeline;
use earlex::compile::LexisBuilder;
use earlex::earley::{EarleyConfig, EarleyParser};
use earlex::grammar::{GrammarBuilder, GrammarDefinition, RuleDefinition};
use earlex::lexer::{Token, TokenDefinition};
use std::hint::black_box;

fn token_definitions() -> Vec<TokenDefinition> {
    vec![
        TokenDefinition::new("identifier", "[a-z_][a-z0-9_]*"),
        TokenDefinition::new("keyword", "let|if|else|while").with_precedence(1),
        TokenDefinition::new("number", "[0-9]+(\\.[0-9]+)?"),
        TokenDefinition::new("operator", "\\+|-|\\*|/|==|="),
        TokenDefinition::new("punctuation", "\\(|\\)|;"),
        TokenDefinition::new("whitespace", "[\\s\\t\\n]+").omitted(),
    ]
}

fn expression_source(terms: usize) -> String {
    let mut source = String::from("x0");
    for i in 1..terms {
        let op = if i % 3 == 0 { " * " } else { " + " };
        source.push_str(op);
        source.push_str(&format!("(x{i} - {i}.5)"));
    }
    source
}

fn expression_grammar() -> GrammarDefinition {
    GrammarDefinition {
        start: "Expr".into(),
        rules: vec![
            RuleDefinition::new("Expr", ["Expr", "$operator", "Term"]),
            RuleDefinition::new("Expr", ["Term"]),
            RuleDefinition::new("Term", ["$identifier"]),
            RuleDefinition::new("Term", ["$number"]),
            RuleDefinition::new("Term", ["$punctuation", "Expr", "$punctuation"]),
        ],
    }
}

fn bench_lexis_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexis_compile");
    group.bench_function("nfa", |b| {
        b.iter(|| {
            LexisBuilder::new()
                .definitions(black_box(token_definitions()))
                .build()
                .unwrap()
        });
    });
    group.bench_function("dfa", |b| {
        b.iter(|| {
            LexisBuilder::new()
                .definitions(black_box(token_definitions()))
                .build_dfa()
                .unwrap()
        });
    });
    group.finish();
}

fn bench_tokenize(c: &mut Criterion) {
    let nfa = LexisBuilder::new()
        .definitions(token_definitions())
        .build()
        .unwrap();
    let dfa = nfa.determinize();
    let source = expression_source(200);

    let mut group = c.benchmark_group("tokenize");
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("nfa", |b| {
        b.iter(|| {
            let mut lexer = nfa.lexer();
            lexer.set_source(black_box(source.as_str()));
            lexer.tokenize().unwrap()
        });
    });
    group.bench_function("dfa", |b| {
        b.iter(|| {
            let mut lexer = dfa.lexer();
            lexer.set_source(black_box(source.as_str()));
            lexer.tokenize().unwrap()
        });
    });
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let lexis = LexisBuilder::new()
        .definitions(token_definitions())
        .build_dfa()
        .unwrap();
    let grammar = GrammarBuilder::new()
        .definition(&expression_grammar())
        .build()
        .unwrap();
    let pipeline = Pipeline::new(lexis, grammar).unwrap();

    let mut group = c.benchmark_group("parse");
    for terms in [10, 50, 200] {
        let source = expression_source(terms);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::new("pipeline", terms), &source, |b, source| {
            b.iter(|| pipeline.parse(black_box(source)).unwrap());
        });
    }
    group.finish();
}

fn bench_ambiguous(c: &mut Criterion) {
    let grammar = GrammarBuilder::new()
        .start("E")
        .rule("E", ["E", "$op", "E"])
        .rule("E", ["$n"])
        .build()
        .unwrap();

    let mut group = c.benchmark_group("ambiguous");
    for operands in [8u32, 16, 24] {
        let tokens: Vec<Token> = (0..operands * 2 - 1)
            .map(|i| {
                let kind = if i % 2 == 0 { "n" } else { "op" };
                Token::new(1, i + 1, kind, kind, true)
            })
            .collect();
        let config = EarleyConfig::new().with_max_alternatives(Some(4));
        let parser = EarleyParser::with_config(&grammar, config);
        group.bench_with_input(BenchmarkId::new("catalan", operands), &tokens, |b, tokens| {
            b.iter(|| parser.parse_tokens(black_box(tokens.clone())).unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_lexis_compile,
    bench_tokenize,
    bench_parse,
    bench_ambiguous
);
criterion_main!(benches);
