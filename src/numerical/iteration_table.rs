use crate::numerical::newton_cotes::{QuadratureResult, Segment};
use log::{Level, info, log_enabled};
use tabled::{builder::Builder, settings::Style};

impl QuadratureResult {
    /// The iteration table as text: one row per evaluated node.
    pub fn pretty_table(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(header(&["i", "xi", "f(xi)", "coeficiente", "f(xi) * coef"]));
        for node in &self.table {
            builder.push_record(vec![
                node.i.to_string(),
                node.xi.to_string(),
                node.fxi.to_string(),
                node.coefficient.to_string(),
                node.weighted.to_string(),
            ]);
        }
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.to_string()
    }

    /// Boole segments as text, `None` for the other rules.
    pub fn pretty_segments(&self) -> Option<String> {
        self.segments.as_deref().map(segments_table)
    }

    /// Writes the parameters, the tables and the result to the `info` log.
    pub fn log_summary(&self) {
        if !log_enabled!(Level::Info) {
            return;
        }
        info!(
            "\n \n {} of {} on [{}, {}] \n n = {}, h = {} \n {} \n \n {}",
            self.method,
            self.function,
            self.a,
            self.b,
            self.n,
            self.h,
            self.pretty_table(),
            self.result
        );
        if let Some(segments) = self.pretty_segments() {
            info!("\n \n SEGMENTS \n \n {}", segments);
        }
    }
}

fn header(titles: &[&str]) -> Vec<String> {
    titles.iter().map(|title| title.to_string()).collect()
}

fn segments_table(segments: &[Segment]) -> String {
    let mut builder = Builder::default();
    builder.push_record(header(&["segmento", "intervalo", "valor"]));
    for segment in segments {
        builder.push_record(vec![
            segment.index.to_string(),
            format!("[{}, {}]", segment.interval[0], segment.interval[1]),
            segment.value.to_string(),
        ]);
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}
