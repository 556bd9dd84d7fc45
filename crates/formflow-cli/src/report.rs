use formflow_core::{CatalogStore, Question, RuleTarget, Verdict, VerdictMap};

/// Controls how much detail the catalog listing prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Detail {
    /// Visibility verdicts only.
    Verdicts,
    /// Full authoring view: options, rules, short ids.
    Authoring,
}

/// Prints the catalog as an ordered tree: sections in display order with
/// their questions beneath them, then any unsectioned questions.
pub struct CatalogPresenter<'a> {
    store: &'a CatalogStore,
    detail: Detail,
}

impl<'a> CatalogPresenter<'a> {
    pub fn new(store: &'a CatalogStore, detail: Detail) -> Self {
        Self { store, detail }
    }

    /// Evaluation view: every entity with its verdict, banners under hidden
    /// sections.
    pub fn show_verdicts(&self, verdicts: &VerdictMap) {
        for section in self.store.sections() {
            let verdict = &verdicts[&section.id];
            println!("Section: {} {}", section.title, marker(verdict));
            if let Some(banner) = &verdict.banner_message {
                println!("  banner: {}", banner);
            }
            for question in self.store.questions_in_section(Some(&section.id)) {
                self.show_question_verdict(question, &verdicts[&question.id]);
            }
        }
        let unsectioned = self.store.questions_in_section(None);
        if !unsectioned.is_empty() {
            println!("Unsectioned:");
            for question in unsectioned {
                self.show_question_verdict(question, &verdicts[&question.id]);
            }
        }
    }

    fn show_question_verdict(&self, question: &Question, verdict: &Verdict) {
        println!("  {} {}", question.label(), marker(verdict));
    }

    /// Authoring view: options and rules per entity, no answers involved.
    pub fn show_catalog(&self) {
        for section in self.store.sections() {
            println!("Section: {}", section.title);
            self.show_rules(&RuleTarget::Section(section.id.clone()), "  ");
            for question in self.store.questions_in_section(Some(&section.id)) {
                self.show_question(question);
            }
        }
        let unsectioned = self.store.questions_in_section(None);
        if !unsectioned.is_empty() {
            println!("Unsectioned:");
            for question in unsectioned {
                self.show_question(question);
            }
        }
    }

    fn show_question(&self, question: &Question) {
        let mut line = format!("  {} ({})", question.label(), question.kind.as_str());
        if question.required {
            line.push_str(" [required]");
        }
        println!("{}", line);
        if self.detail == Detail::Authoring {
            for option in self.store.options_for_question(&question.id) {
                println!("    option: {} = \"{}\"", option.value, option.text);
            }
            self.show_rules(&RuleTarget::Question(question.id.clone()), "    ");
        }
    }

    fn show_rules(&self, target: &RuleTarget, indent: &str) {
        for rule in self.store.rules_for(target) {
            println!("{}rule: {}", indent, rule.describe());
            if let Some(banner) = &rule.banner_message {
                println!("{}  banner: \"{}\"", indent, banner);
            }
        }
    }
}

fn marker(verdict: &Verdict) -> &'static str {
    if verdict.visible { "(visible)" } else { "(hidden)" }
}
