use anyhow::Context;
use serde::Deserialize;
use sweep_engine::{Engine, Options, Ordered, Span, SpanError};


#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SourcesConfig {
    #[serde(default)]
    pub options: Options,
    pub sources: Vec<SourceConfig>
}


#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SourceConfig {
    pub name: String,
    pub spans: Vec<SpanConfig>
}


/// `[begin, end]` or `[begin, end, "tag"]`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SpanConfig {
    Plain(i64, i64),
    Tagged(i64, i64, String)
}


impl SpanConfig {
    pub fn build(self, engine: &Engine<Ordered<i64>>) -> Result<Span<i64, String>, SpanError> {
        match self {
            SpanConfig::Plain(begin, end) => engine.span(begin, end),
            SpanConfig::Tagged(begin, end, tag) => engine.tagged_span(begin, end, tag)
        }
    }
}


impl SourcesConfig {
    pub fn read_config_file(file: &str) -> anyhow::Result<SourcesConfig> {
        let reader = std::io::BufReader::new(std::fs::File::open(file)?);
        let config = serde_json::from_reader(reader)?;
        Ok(config)
    }
}


impl SourceConfig {
    pub fn build_spans(self, engine: &Engine<Ordered<i64>>) -> anyhow::Result<Vec<Span<i64, String>>> {
        let name = self.name;
        self.spans.into_iter()
            .enumerate()
            .map(|(i, s)| {
                s.build(engine).with_context(|| format!("invalid span #{} of source '{}'", i, name))
            })
            .collect()
    }
}
