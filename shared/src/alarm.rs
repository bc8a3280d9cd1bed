use crate::{
    settings::{AlertSettings, SoundTone},
    status::StatusView,
    Result,
};

/// The audio element driven by the alarm.
pub trait AlarmOutput {
    /// Points the element at `source`, loops it and starts playback.
    fn start(&mut self, source: &str) -> Result<()>;
    /// Pauses and rewinds.
    fn stop(&mut self);
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AlarmInputs {
    pub is_drowsy: bool,
    pub sound_enabled: bool,
    pub tone: SoundTone,
}

impl AlarmInputs {
    pub fn new(status: &StatusView, settings: &AlertSettings) -> Self {
        Self {
            is_drowsy: status.is_drowsy,
            sound_enabled: settings.sound_enabled,
            tone: settings.sound_tone,
        }
    }

    pub fn should_sound(&self) -> bool {
        self.is_drowsy && self.sound_enabled
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AlarmTransition {
    Started(SoundTone),
    Stopped,
    Unchanged,
}

/// Remembers which tone is currently sounding so that re-evaluating the
/// same inputs never restarts playback.
#[derive(Debug)]
pub struct Alarm {
    sounds_path: String,
    sounding: Option<SoundTone>,
}

impl Alarm {
    pub fn new(sounds_path: impl Into<String>) -> Self {
        Self {
            sounds_path: sounds_path.into(),
            sounding: None,
        }
    }

    pub fn sounding(&self) -> Option<SoundTone> {
        self.sounding
    }

    pub fn evaluate(&mut self, inputs: AlarmInputs, output: &mut impl AlarmOutput) -> AlarmTransition {
        match (inputs.should_sound(), self.sounding) {
            (true, Some(tone)) if tone == inputs.tone => AlarmTransition::Unchanged,
            (true, _) => {
                let source = inputs.tone.asset_path(&self.sounds_path);
                // browsers may refuse playback before the first user gesture
                if let Err(error) = output.start(&source) {
                    log::error!("error playing alarm {source}: {error}");
                }
                self.sounding = Some(inputs.tone);
                AlarmTransition::Started(inputs.tone)
            }
            (false, Some(_)) => {
                output.stop();
                self.sounding = None;
                AlarmTransition::Stopped
            }
            (false, None) => AlarmTransition::Unchanged,
        }
    }

    pub fn silence(&mut self, output: &mut impl AlarmOutput) {
        if self.sounding.take().is_some() {
            output.stop();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{status::StatusSnapshot, DashboardError};
    use pretty_assertions::assert_eq;

    #[derive(Debug, PartialEq, Eq)]
    enum Call {
        Start(String),
        Stop,
    }

    #[derive(Default)]
    struct RecordingOutput {
        calls: Vec<Call>,
        refuse_playback: bool,
    }

    impl AlarmOutput for RecordingOutput {
        fn start(&mut self, source: &str) -> Result<()> {
            self.calls.push(Call::Start(source.to_string()));
            if self.refuse_playback {
                Err(DashboardError::Network("NotAllowedError".into()))
            } else {
                Ok(())
            }
        }

        fn stop(&mut self) {
            self.calls.push(Call::Stop);
        }
    }

    fn inputs(is_drowsy: bool, sound_enabled: bool) -> AlarmInputs {
        AlarmInputs {
            is_drowsy,
            sound_enabled,
            tone: SoundTone::Siren,
        }
    }

    #[test]
    pub fn sounds_only_when_drowsy_and_enabled() {
        assert!(inputs(true, true).should_sound());
        assert!(!inputs(true, false).should_sound());
        assert!(!inputs(false, true).should_sound());
        assert!(!inputs(false, false).should_sound());
    }

    #[test]
    pub fn drowsy_siren_scenario_starts_looping_siren() {
        let status = StatusView::from_poll(Ok(StatusSnapshot {
            is_drowsy: true,
            ear: Some(0.18),
        }));
        let settings = AlertSettings::default();
        let mut alarm = Alarm::new("/sounds");
        let mut output = RecordingOutput::default();

        let transition = alarm.evaluate(AlarmInputs::new(&status, &settings), &mut output);

        assert_eq!(transition, AlarmTransition::Started(SoundTone::Siren));
        assert_eq!(output.calls, vec![Call::Start("/sounds/siren.mp3".into())]);
    }

    #[test]
    pub fn offline_scenario_pauses_the_alarm() {
        let mut alarm = Alarm::new("/sounds");
        let mut output = RecordingOutput::default();
        alarm.evaluate(inputs(true, true), &mut output);

        let offline = StatusView::from_poll(Err(DashboardError::Network("refused".into())));
        let transition = alarm.evaluate(
            AlarmInputs::new(&offline, &AlertSettings::default()),
            &mut output,
        );

        assert_eq!(transition, AlarmTransition::Stopped);
        assert_eq!(output.calls.last(), Some(&Call::Stop));
        assert_eq!(alarm.sounding(), None);
    }

    #[test]
    pub fn toggling_either_input_flips_playback() {
        let mut alarm = Alarm::new("/sounds");
        let mut output = RecordingOutput::default();

        alarm.evaluate(inputs(true, true), &mut output);
        assert_eq!(alarm.evaluate(inputs(true, false), &mut output), AlarmTransition::Stopped);
        assert!(matches!(
            alarm.evaluate(inputs(true, true), &mut output),
            AlarmTransition::Started(_)
        ));
        assert_eq!(alarm.evaluate(inputs(false, true), &mut output), AlarmTransition::Stopped);
        assert_eq!(output.calls.len(), 4);
    }

    #[test]
    pub fn repeated_evaluation_does_not_restart() {
        let mut alarm = Alarm::new("/sounds");
        let mut output = RecordingOutput::default();

        alarm.evaluate(inputs(true, true), &mut output);
        assert_eq!(alarm.evaluate(inputs(true, true), &mut output), AlarmTransition::Unchanged);
        assert_eq!(alarm.evaluate(inputs(false, false), &mut output), AlarmTransition::Stopped);
        assert_eq!(alarm.evaluate(inputs(false, false), &mut output), AlarmTransition::Unchanged);
        assert_eq!(output.calls.len(), 2);
    }

    #[test]
    pub fn tone_change_while_sounding_switches_source() {
        let mut alarm = Alarm::new("/sounds");
        let mut output = RecordingOutput::default();

        alarm.evaluate(inputs(true, true), &mut output);
        let bell = AlarmInputs {
            tone: SoundTone::Bell,
            ..inputs(true, true)
        };
        assert_eq!(alarm.evaluate(bell, &mut output), AlarmTransition::Started(SoundTone::Bell));
        assert_eq!(output.calls.last(), Some(&Call::Start("/sounds/bell.mp3".into())));
    }

    #[test]
    pub fn refused_playback_is_not_retried_on_same_inputs() {
        let mut alarm = Alarm::new("/sounds");
        let mut output = RecordingOutput {
            refuse_playback: true,
            ..Default::default()
        };

        alarm.evaluate(inputs(true, true), &mut output);
        alarm.evaluate(inputs(true, true), &mut output);
        assert_eq!(output.calls.len(), 1);
    }

    #[test]
    pub fn silence_stops_only_a_sounding_alarm() {
        let mut alarm = Alarm::new("/sounds");
        let mut output = RecordingOutput::default();
        alarm.silence(&mut output);
        assert!(output.calls.is_empty());

        alarm.evaluate(inputs(true, true), &mut output);
        alarm.silence(&mut output);
        assert_eq!(output.calls.last(), Some(&Call::Stop));
    }
}
