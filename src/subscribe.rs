//! Subscription URL built from the current form

use crate::error::TtsError;
use crate::state::{FormData, TEXT_KEY};
use url::Url;

pub const SUBSCRIBE_PATH: &str = "/tts/api/subscribe";
const HOST_KEY: &str = "host";

/// Build `<origin>/tts/api/subscribe?<form minus text>&host=<origin>`.
///
/// The free text is left out so subscribers can supply their own; `host` tells
/// the server where the invoke endpoint lives.
pub fn subscription_url(origin: &str, form: &FormData) -> Result<Url, TtsError> {
    let mut url = Url::parse(origin)?.join(SUBSCRIBE_PATH)?;
    {
        let mut query = url.query_pairs_mut();
        for (key, value) in form.iter() {
            if key == TEXT_KEY || key == HOST_KEY {
                continue;
            }
            query.append_pair(key, value);
        }
        query.append_pair(HOST_KEY, origin);
    }
    Ok(url)
}
