use std::sync::Arc;

use crate::error::Result;
use crate::providers::provider::ProviderSettings;
use crate::providers::registry::ProviderRegistry;

#[derive(Debug, Clone, Copy)]
pub struct LibraryEntry {
    pub endpoint: &'static str,
    pub patterns: &'static [&'static str],
}

/// Well-known oEmbed endpoints, listed in registration order. The scheme-qualified
/// YouTube endpoint follows the plain one so it wins for https URLs.
pub const PROVIDER_LIBRARY: &[LibraryEntry] = &[
    LibraryEntry {
        endpoint: "http://blip.tv/oembed",
        patterns: &[r"http://blip.tv/\S+"],
    },
    LibraryEntry {
        endpoint: "http://chirb.it/oembed.json",
        patterns: &[r"http://chirb.it/\S+"],
    },
    LibraryEntry {
        endpoint: "https://www.circuitlab.com/circuit/oembed",
        patterns: &[r"https://www.circuitlab.com/circuit/\S+"],
    },
    LibraryEntry {
        endpoint: "http://www.collegehumor.com/oembed.json",
        patterns: &[r"http://www.collegehumor.com/video/\S+"],
    },
    LibraryEntry {
        endpoint: "http://www.dailymotion.com/services/oembed",
        patterns: &[r"https?://(www\.)?dailymotion\.com/\S+"],
    },
    LibraryEntry {
        endpoint: "https://www.flickr.com/services/oembed/",
        patterns: &[r"https?://\S*?flickr.com/\S+", r"https?://flic\.kr/\S*"],
    },
    LibraryEntry {
        endpoint: "http://www.funnyordie.com/oembed",
        patterns: &[r"https?://(www\.)?funnyordie\.com/videos/\S+"],
    },
    LibraryEntry {
        endpoint: "https://github.com/api/oembed",
        patterns: &[r"https?://gist.github.com/\S*"],
    },
    LibraryEntry {
        endpoint: "http://www.hulu.com/api/oembed.json",
        patterns: &[r"http://www.hulu.com/watch/\S+"],
    },
    LibraryEntry {
        endpoint: "http://www.ifixit.com/Embed",
        patterns: &[r"http://www.ifixit.com/Guide/View/\S+"],
    },
    LibraryEntry {
        endpoint: "http://api.imgur.com/oembed",
        patterns: &[r"http://\S*imgur\.com/\S+"],
    },
    LibraryEntry {
        endpoint: "http://api.instagram.com/oembed",
        patterns: &[r"https?://(www\.)?instagr(\.am|am\.com)/p/\S+"],
    },
    LibraryEntry {
        endpoint: "http://www.jest.com/oembed.json",
        patterns: &[r"http://www.jest.com/(video|embed)/\S+"],
    },
    LibraryEntry {
        endpoint: "http://api.mobypicture.com/oEmbed",
        patterns: &[
            r"http://www.mobypicture.com/user/\S*?/view/\S*",
            r"http://moby.to/\S*",
        ],
    },
    LibraryEntry {
        endpoint: "http://photobucket.com/oembed",
        patterns: &[
            r"http://i\S*.photobucket.com/albums/\S+",
            r"http://gi\S*.photobucket.com/groups/\S+",
        ],
    },
    LibraryEntry {
        endpoint: "http://www.polleverywhere.com/services/oembed/",
        patterns: &[
            r"http://www.polleverywhere.com/(polls|multiple_choice_polls|free_text_polls)/\S+",
        ],
    },
    LibraryEntry {
        endpoint: "http://polldaddy.com/oembed/",
        patterns: &[r"https?://(.+\.)?polldaddy\.com/\S*"],
    },
    LibraryEntry {
        endpoint: "http://qik.com/api/oembed.json",
        patterns: &[r"http://qik.com/video/\S+"],
    },
    LibraryEntry {
        endpoint: "http://revision3.com/api/oembed/",
        patterns: &[r"http://\S*.revision3.com/\S+"],
    },
    LibraryEntry {
        endpoint: "http://www.slideshare.net/api/oembed/2",
        patterns: &[
            r"https?://www.slideshare.net/[^\/]+/\S+",
            r"https?://slidesha\.re/\S*",
        ],
    },
    LibraryEntry {
        endpoint: "http://api.smugmug.com/services/oembed/",
        patterns: &[r"http://\S*.smugmug.com/\S*"],
    },
    LibraryEntry {
        endpoint: "http://soundcloud.com/oembed",
        patterns: &[r"https://\S*?soundcloud.com/\S+"],
    },
    LibraryEntry {
        endpoint: "https://speakerdeck.com/oembed.json",
        patterns: &[r"https?://speakerdeck\.com/\S*"],
    },
    LibraryEntry {
        endpoint: "http://www.scribd.com/services/oembed",
        patterns: &[r"https?://(www\.)?scribd\.com/\S*"],
    },
    LibraryEntry {
        endpoint: "https://api.twitter.com/1/statuses/oembed.json",
        patterns: &[r"https?://(www\.)?twitter.com/\S+/status(es)?/\S+"],
    },
    LibraryEntry {
        endpoint: "http://vimeo.com/api/oembed.json",
        patterns: &[r"http://vimeo.com/\S+", r"https://vimeo.com/\S+"],
    },
    LibraryEntry {
        endpoint: "http://lab.viddler.com/services/oembed/",
        patterns: &[r"http://\S*.viddler.com/\S*"],
    },
    LibraryEntry {
        endpoint: "http://www.youtube.com/oembed",
        patterns: &[r"http://(\S*.)?youtu(\.be/|be\.com/watch)\S+"],
    },
    LibraryEntry {
        endpoint: "http://www.youtube.com/oembed?scheme=https&",
        patterns: &[r"https://(\S*.)?youtu(\.be/|be\.com/watch)\S+"],
    },
    LibraryEntry {
        endpoint: "http://www.yfrog.com/api/oembed",
        patterns: &[r"http://(\S*\.)?yfrog\.com/\S*"],
    },
    LibraryEntry {
        endpoint: "http://public-api.wordpress.com/oembed/",
        patterns: &[r"http://\S+.wordpress.com/\S+"],
    },
    LibraryEntry {
        endpoint: "http://wordpress.tv/oembed/",
        patterns: &[r"https?://wordpress.tv/\S+"],
    },
];

/// Registers one shared provider per library endpoint, once per pattern.
/// Returns the number of patterns registered.
pub fn bootstrap_basic(registry: &mut ProviderRegistry, settings: &ProviderSettings) -> Result<usize> {
    let mut registered = 0;
    for entry in PROVIDER_LIBRARY {
        let provider = Arc::new(settings.build(entry.endpoint));
        for pattern in entry.patterns {
            registry.register(*pattern, provider.clone())?;
            registered += 1;
        }
    }

    tracing::info!(
        endpoints = PROVIDER_LIBRARY.len(),
        patterns = registered,
        "registered built-in oembed providers"
    );
    Ok(registered)
}
