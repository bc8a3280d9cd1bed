use drowsy_dashboard_shared::{alarm::AlarmOutput, DashboardError, Result};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::HtmlAudioElement;

pub(crate) struct AudioAlarm(pub HtmlAudioElement);

impl AlarmOutput for AudioAlarm {
    fn start(&mut self, source: &str) -> Result<()> {
        self.0.set_src(source);
        self.0.set_loop(true);
        let playing = self
            .0
            .play()
            .map_err(|e| DashboardError::Network(format!("{e:?}")))?;
        spawn_local(async move {
            if let Err(error) = JsFuture::from(playing).await {
                log::error!("error playing audio (user interaction required): {error:?}");
            }
        });
        Ok(())
    }

    fn stop(&mut self) {
        if let Err(error) = self.0.pause() {
            log::warn!("could not pause alarm: {error:?}");
        }
        self.0.set_current_time(0.0);
    }
}
