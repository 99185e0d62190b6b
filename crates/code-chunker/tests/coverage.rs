use codeqa_code_chunker::{Chunker, ChunkerConfig, ChunkingStrategy, CodeChunk, FileType};

fn chunk(code: &str, file_type: FileType, max_chunk_tokens: usize) -> Vec<CodeChunk> {
    let config = ChunkerConfig {
        max_chunk_tokens,
        ..ChunkerConfig::default()
    };
    Chunker::new(config)
        .expect("valid config")
        .chunk(code, file_type)
        .expect("chunking failed")
}

fn python_module(functions: usize) -> String {
    let mut code = String::from("import logging\n\nlogger = logging.getLogger(__name__)\n\n");
    for i in 0..functions {
        code.push_str(&format!(
            "def handler_{i}(event):\n    logger.info(\"event %s\", event)\n    return event[\"id\"] + {i}\n\n"
        ));
    }
    code
}

#[test]
fn chunks_cover_large_python_module_in_order() {
    let code = python_module(60);
    let chunks = chunk(&code, FileType::Python, 200);

    assert!(chunks.len() > 1, "expected the module to be split");
    let joined: String = chunks.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(joined, code);

    for pair in chunks.windows(2) {
        assert_eq!(pair[0].end_line + 1, pair[1].start_line);
    }
    assert_eq!(chunks[0].start_line, 1);
    assert_eq!(
        chunks.last().map(|c| c.end_line),
        Some(code.lines().count())
    );
}

#[test]
fn python_chunks_never_split_a_function() {
    let code = python_module(60);
    let chunks = chunk(&code, FileType::Python, 200);

    for chunk in &chunks[1..] {
        let first = chunk.code.lines().next().unwrap_or_default();
        assert!(
            first.starts_with("def handler_") || first.is_empty(),
            "chunk {} starts mid-function: {first:?}",
            chunk.label()
        );
    }
}

#[test]
fn chunk_start_lines_address_original_lines() {
    let code = python_module(40);
    let original: Vec<&str> = code.lines().collect();

    for chunk in chunk(&code, FileType::Python, 150) {
        let first_line = chunk.code.lines().next().unwrap_or_default();
        assert_eq!(original[chunk.start_line - 1], first_line);
    }
}

#[test]
fn line_count_strategy_ignores_syntax() {
    let code = python_module(10);
    let chunker = Chunker::new(ChunkerConfig {
        strategy: ChunkingStrategy::LineCount,
        max_chunk_tokens: 50,
        fallback_chunk_lines: 7,
    })
    .expect("valid config");

    let chunks = chunker.chunk(&code, FileType::Python).expect("chunking");
    let starts: Vec<usize> = chunks.iter().map(|c| c.start_line).collect();
    let expected: Vec<usize> = (0..chunks.len()).map(|i| i * 7 + 1).collect();
    assert_eq!(starts, expected);
}
