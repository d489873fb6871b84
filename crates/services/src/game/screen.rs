/// Screens the learner moves between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Start,
    LanguageSelect,
    Map,
    Puzzle,
    SuccessModal,
    Escape,
}

/// Learner actions that drive screen transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Begin,
    SelectLanguage,
    OpenLevel,
    ToggleHint,
    Submit,
    NextLevel,
    BackToMap,
    ExitLevel,
    BackToLanguages,
    TryAnother,
    Restart,
}

impl Screen {
    /// Whether `action` may be taken while this screen is showing.
    #[must_use]
    pub fn allows(self, action: Action) -> bool {
        use Action as A;
        match (self, action) {
            (_, A::Restart) => true,
            (Screen::Start, A::Begin) => true,
            (Screen::LanguageSelect, A::SelectLanguage) => true,
            (Screen::Map, A::OpenLevel | A::BackToLanguages) => true,
            (Screen::Puzzle, A::ToggleHint | A::Submit | A::ExitLevel) => true,
            (Screen::SuccessModal, A::NextLevel | A::BackToMap) => true,
            (Screen::Escape, A::TryAnother) => true,
            _ => false,
        }
    }
}
