//! HTML tutorial report: narrative sections with inline plotly charts.
use std::path::Path;

use anyhow::{Context, Result};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use plotly::Plot;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";

fn slug(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect()
}

/// One titled block of prose and charts.
pub struct ReportSection {
    title: String,
    content: Vec<Markup>,
    n_plots: usize,
}

impl ReportSection {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            content: Vec::new(),
            n_plots: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn add_content(&mut self, markup: Markup) {
        self.content.push(markup);
    }

    /// Embed a chart; the plotly.js bundle is loaded once by the report head.
    pub fn add_plot(&mut self, plot: Plot) {
        let div_id = format!("{}-plot-{}", slug(&self.title), self.n_plots);
        self.n_plots += 1;
        let inline = plot.to_inline_html(Some(&div_id));
        self.content.push(html! {
            div class="plot" { (PreEscaped(inline)) }
        });
    }

    pub fn n_plots(&self) -> usize {
        self.n_plots
    }

    fn render(&self) -> Markup {
        html! {
            section id=(slug(&self.title)) {
                h2 { (self.title) }
                @for block in &self.content {
                    (block)
                }
            }
        }
    }
}

pub struct Report {
    title: String,
    intro: Option<String>,
    sections: Vec<ReportSection>,
}

impl Report {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            intro: None,
            sections: Vec::new(),
        }
    }

    pub fn set_intro(&mut self, intro: &str) {
        self.intro = Some(intro.to_string());
    }

    pub fn add_section(&mut self, section: ReportSection) {
        self.sections.push(section);
    }

    pub fn sections(&self) -> &[ReportSection] {
        &self.sections
    }

    pub fn render(&self) -> Markup {
        let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    title { (self.title) }
                    script src=(PLOTLY_CDN) {}
                    style {
                        "body { font-family: sans-serif; max-width: 1100px; margin: auto; }"
                        " .plot { margin: 1.5em 0; }"
                        " nav li { display: inline; margin-right: 1em; }"
                        " table.summary td, table.summary th { padding: 0 0.6em; text-align: right; }"
                    }
                }
                body {
                    h1 { (self.title) }
                    p class="generated" { "Generated " (generated) }
                    @if let Some(intro) = &self.intro {
                        p { (intro) }
                    }
                    nav {
                        ul {
                            @for section in &self.sections {
                                li { a href=(format!("#{}", slug(section.title()))) { (section.title()) } }
                            }
                        }
                    }
                    @for section in &self.sections {
                        (section.render())
                    }
                }
            }
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(&path, self.render().into_string())
            .with_context(|| format!("Failed to write report: {}", path.as_ref().display()))?;
        log::info!("Report written to {}", path.as_ref().display());
        Ok(())
    }
}
