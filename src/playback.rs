//! Playback trigger. The player itself lives outside this crate; all we do is
//! point it at an embed address.

use anyhow::{Context, Result};
use log::{debug, info};
use open::that as open_link;

use crate::video::embed_url;

/// Something that can show an embedded video given its address.
pub trait PlaybackSurface {
    fn load(&mut self, embed_url: &str) -> Result<()>;
    /// Address currently shown, if any.
    fn current(&self) -> Option<&str>;
}

/// Opens embed addresses in the system browser and remembers the last one.
#[derive(Debug, Default)]
pub struct BrowserPlayer {
    current: Option<String>,
}

impl PlaybackSurface for BrowserPlayer {
    fn load(&mut self, embed_url: &str) -> Result<()> {
        open_link(embed_url).with_context(|| format!("failed to open {embed_url}"))?;
        self.current = Some(embed_url.to_string());
        Ok(())
    }

    fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

/// Decode a play token (see `SongRow::play_token`) and start the matching
/// video. Returns the embed address when playback started; a token that does
/// not decode or a link without a video id leaves the surface as it was.
pub fn play_encoded(surface: &mut dyn PlaybackSurface, token: &str) -> Result<Option<String>> {
    let Ok(url) = urlencoding::decode(token) else {
        debug!("ignoring undecodable play token");
        return Ok(None);
    };
    let Some(address) = embed_url(&url) else {
        debug!("no video id in {url}");
        return Ok(None);
    };
    surface.load(&address)?;
    info!("playing {address}");
    Ok(Some(address))
}
