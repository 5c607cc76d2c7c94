use anyhow::{Context, Result};
use log::{debug, warn};
use serde_json::{Map, Value};

use super::blob::BlobStore;
use crate::models::Song;

/// Read the persisted song list. A missing key, a `null` blob, a failed read
/// or a blob that is not a JSON array all come back as an empty list; the
/// cause only reaches the log.
///
/// Records are read one at a time so a single odd record never costs the
/// rest: unknown fields are ignored, missing ones default, and numbers
/// written as floats or strings are coerced. Entries that are not objects are
/// skipped.
pub fn load_songs(store: &dyn BlobStore, key: &str) -> Vec<Song> {
    let raw = match store.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("no stored songs under `{key}`");
            return Vec::new();
        }
        Err(err) => {
            warn!("could not read stored songs: {err}");
            return Vec::new();
        }
    };

    let records = match serde_json::from_str::<Option<Vec<Value>>>(&raw) {
        Ok(records) => records.unwrap_or_default(),
        Err(err) => {
            warn!("discarding unreadable song blob under `{key}`: {err}");
            return Vec::new();
        }
    };

    let mut parsed = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match record {
            Value::Object(fields) => parsed.push(song_from_record(fields)),
            other => warn!("skipping stored entry {index}: expected an object, got {other}"),
        }
    }

    // Records without a usable id are numbered above every stored id.
    let mut last = parsed.iter().filter_map(|(id, _)| *id).max();
    let mut songs = Vec::with_capacity(parsed.len());
    for (id, mut song) in parsed {
        match id.or_else(|| next_free_id(&mut last)) {
            Some(id) => {
                song.id = id;
                songs.push(song);
            }
            None => warn!("dropping stored song `{}`: no free id left", song.title),
        }
    }

    debug!("loaded {} songs from `{key}`", songs.len());
    songs
}

/// Build a song from one stored object. The id comes back separately since it
/// may be absent; `Song::id` is only a placeholder until the caller fills it.
fn song_from_record(mut fields: Map<String, Value>) -> (Option<i64>, Song) {
    let id = fields.get("id").and_then(whole_number);
    if id.is_none() {
        debug!("stored song without a usable id: {:?}", fields.get("id"));
    }
    let song = Song {
        id: 0,
        title: text(fields.remove("title")),
        url: text(fields.remove("url")),
        rating: fields.get("rating").and_then(whole_number),
        date_added: fields.get("dateAdded").and_then(whole_number),
    };
    (id, song)
}

fn next_free_id(last: &mut Option<i64>) -> Option<i64> {
    let id = match *last {
        Some(last) => last.checked_add(1)?,
        None => 1,
    };
    *last = Some(id);
    Some(id)
}

/// Integer value of a JSON number or numeric string. Fractions are truncated
/// and out-of-range values saturate.
fn whole_number(value: &Value) -> Option<i64> {
    let from_float = |f: f64| f.is_finite().then(|| f.trunc() as i64);
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(from_float)),
        Value::String(raw) => {
            let raw = raw.trim();
            raw.parse::<i64>()
                .ok()
                .or_else(|| raw.parse::<f64>().ok().and_then(from_float))
        }
        _ => None,
    }
}

fn text(value: Option<Value>) -> String {
    match value {
        Some(Value::String(text)) => text,
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Serialize the full collection and overwrite the stored blob.
pub fn save_songs(store: &mut dyn BlobStore, key: &str, songs: &[Song]) -> Result<()> {
    let payload = serde_json::to_string(songs).context("failed to serialize songs")?;
    store
        .write(key, &payload)
        .context("failed to persist songs")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryBlobStore;

    fn song(id: i64, title: &str) -> Song {
        Song {
            id,
            title: title.to_string(),
            url: format!("https://example.com/{id}"),
            rating: Some(id),
            date_added: Some(id),
        }
    }

    #[test]
    fn missing_key_loads_empty() {
        let store = MemoryBlobStore::new();
        assert!(load_songs(&store, "songs").is_empty());
    }

    #[test]
    fn corrupt_blob_loads_empty() {
        let store = MemoryBlobStore::with_entry("songs", "{not json");
        assert!(load_songs(&store, "songs").is_empty());
    }

    #[test]
    fn null_blob_loads_empty() {
        let store = MemoryBlobStore::with_entry("songs", "null");
        assert!(load_songs(&store, "songs").is_empty());
    }

    #[test]
    fn save_then_load_keeps_order() {
        let mut store = MemoryBlobStore::new();
        let songs = vec![song(3, "c"), song(1, "a"), song(2, "b")];
        save_songs(&mut store, "songs", &songs).unwrap();
        assert_eq!(load_songs(&store, "songs"), songs);
    }

    #[test]
    fn reads_camel_case_blob_with_large_ids() {
        let raw = r#"[{"id":1700000000000,"title":"A","url":"https://youtu.be/dQw4w9WgXcQ","rating":5,"dateAdded":1700000000000}]"#;
        let store = MemoryBlobStore::with_entry("songs", raw);
        let songs = load_songs(&store, "songs");
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].date_added, Some(1_700_000_000_000));
        assert_eq!(songs[0].rating, Some(5));
    }

    #[test]
    fn one_odd_record_does_not_cost_the_others() {
        let raw = r#"[
            {"id":1,"title":"Keep me","url":"https://youtu.be/dQw4w9WgXcQ","rating":5,"dateAdded":1},
            {"title":"No id","url":"u","rating":4.5,"artist":"someone"},
            {"id":"7","title":"Stringly","rating":"3","dateAdded":7.0},
            42
        ]"#;
        let store = MemoryBlobStore::with_entry("songs", raw);
        let songs = load_songs(&store, "songs");

        let titles: Vec<&str> = songs.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Keep me", "No id", "Stringly"]);
        assert_eq!(songs[0].id, 1);
        // Next free id above the largest stored one.
        assert_eq!(songs[1].id, 8);
        assert_eq!(songs[1].rating, Some(4));
        assert_eq!(songs[1].date_added, None);
        assert_eq!(songs[2].id, 7);
        assert_eq!(songs[2].url, "");
        assert_eq!(songs[2].rating, Some(3));
        assert_eq!(songs[2].date_added, Some(7));
    }

    #[test]
    fn missing_fields_default_per_record() {
        let raw = r#"[{"id":3},{"id":4,"title":null,"rating":null,"dateAdded":"soon"}]"#;
        let store = MemoryBlobStore::with_entry("songs", raw);
        let songs = load_songs(&store, "songs");
        assert_eq!(songs.len(), 2);
        for song in &songs {
            assert_eq!(song.title, "");
            assert_eq!(song.url, "");
            assert_eq!(song.rating, None);
            assert_eq!(song.date_added, None);
        }
    }

    #[test]
    fn records_without_ids_are_numbered_from_one_when_none_are_stored() {
        let raw = r#"[{"title":"A"},{"title":"B"}]"#;
        let store = MemoryBlobStore::with_entry("songs", raw);
        let ids: Vec<i64> = load_songs(&store, "songs").iter().map(|s| s.id).collect();
        assert_eq!(ids, [1, 2]);
    }

    #[test]
    fn non_array_blob_loads_empty() {
        let store = MemoryBlobStore::with_entry("songs", r#"{"id":1,"title":"A"}"#);
        assert!(load_songs(&store, "songs").is_empty());
    }
}
