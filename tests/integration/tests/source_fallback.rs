//! Delivery-mode resolution and adaptive fallback through the shell

use anyhow::Result;
use clipset_player::media::{MediaSurface, SyntheticSurface};
use clipset_player::player::PlayerShellBuilder;
use clipset_player::source::{
    DeliveryMode, NativeAdaptiveSupport, StaticProbe, StreamSource, SyntheticAdaptiveFactory,
};
use clipset_player::utils::config::Tuning;
use clipset_player::utils::prefs::MemoryStore;
use clipset_player_integration_tests::{FixtureOptions, TestFixture, MANIFEST_URL, PROGRESSIVE_URL};
use std::sync::Arc;

#[test]
fn progressive_only_source_is_terminal() -> Result<()> {
    let fixture = TestFixture::new()?;
    assert_eq!(
        fixture.shell.delivery_mode(),
        Some(DeliveryMode::Progressive)
    );
    assert_eq!(fixture.surface.src().as_deref(), Some(PROGRESSIVE_URL));
    assert_eq!(fixture.factory.created_count(), 0);

    Ok(())
}

#[test]
fn manifest_attaches_client_engine_with_signed_url() -> Result<()> {
    let fixture = TestFixture::with_options(FixtureOptions::adaptive())?;
    assert_eq!(
        fixture.shell.delivery_mode(),
        Some(DeliveryMode::ClientAdaptive)
    );

    let engines = fixture.factory.engines();
    assert_eq!(engines.len(), 1);
    assert!(engines[0].is_attached());
    assert_eq!(
        engines[0].manifest_url().unwrap(),
        format!("{MANIFEST_URL}?token=secret")
    );

    Ok(())
}

#[test]
fn fatal_error_falls_back_to_progressive_exactly_once() -> Result<()> {
    let fixture = TestFixture::with_options(FixtureOptions::adaptive())?;
    fixture.make_ready(300.0);
    fixture.surface.script_set_time_externally(75.0);

    fixture.factory.engines()[0].script_fatal_error("level load failed");
    fixture.pump();

    assert_eq!(
        fixture.shell.delivery_mode(),
        Some(DeliveryMode::Progressive)
    );
    assert_eq!(fixture.surface.src().as_deref(), Some(PROGRESSIVE_URL));
    assert!(!fixture.factory.engines()[0].is_attached());

    // Position intent survives the src swap
    assert_eq!(fixture.surface.current_time(), 75.0);

    // No re-attach for the remainder of the mount
    fixture.pump();
    assert_eq!(fixture.factory.created_count(), 1);

    Ok(())
}

#[test]
fn recoverable_errors_stay_invisible() -> Result<()> {
    let fixture = TestFixture::with_options(FixtureOptions::adaptive())?;
    fixture.make_ready(300.0);

    fixture.factory.engines()[0].script_recovered();
    fixture.pump();

    assert_eq!(
        fixture.shell.delivery_mode(),
        Some(DeliveryMode::ClientAdaptive)
    );
    assert!(fixture.factory.engines()[0].is_attached());
    assert!(!fixture.shell.state().has_error);

    Ok(())
}

#[test]
fn source_change_tears_down_and_re_resolves() -> Result<()> {
    let fixture = TestFixture::with_options(FixtureOptions::adaptive())?;
    fixture.make_ready(300.0);

    // Even after a fallback, a new video gets adaptive delivery again
    fixture.factory.engines()[0].script_fatal_error("demuxer");
    fixture.pump();
    assert_eq!(
        fixture.shell.delivery_mode(),
        Some(DeliveryMode::Progressive)
    );

    let mode = fixture.shell.update_source(StreamSource::with_manifest(
        "https://media.example/videos/43.mp4",
        "https://media.example/videos/43/index.m3u8",
        Some("secret".to_string()),
    ));

    assert_eq!(mode, DeliveryMode::ClientAdaptive);
    assert_eq!(fixture.factory.created_count(), 2);
    assert!(fixture.factory.engines()[1].is_attached());
    assert!(!fixture.factory.engines()[0].is_attached());

    Ok(())
}

#[test]
fn apple_affirmative_probe_short_circuits_to_native() -> Result<()> {
    let surface = Arc::new(SyntheticSurface::new());
    let shell = PlayerShellBuilder::new(Arc::clone(&surface) as Arc<dyn MediaSurface>)
        .with_source(StreamSource::with_manifest(
            PROGRESSIVE_URL,
            MANIFEST_URL,
            Some("secret".to_string()),
        ))
        .with_probe(Box::new(StaticProbe {
            support: NativeAdaptiveSupport::Affirmative,
            apple_media_stack: true,
        }))
        .with_adaptive_factory(Box::new(SyntheticAdaptiveFactory::new()))
        .with_preference_store(Arc::new(MemoryStore::new()))
        .with_tuning(Tuning::default())
        .build()?;

    assert_eq!(shell.delivery_mode(), Some(DeliveryMode::NativeAdaptive));
    assert_eq!(
        surface.src().unwrap(),
        format!("{MANIFEST_URL}?token=secret")
    );

    Ok(())
}

#[test]
fn maybe_answers_never_short_circuit() -> Result<()> {
    let surface = Arc::new(SyntheticSurface::new());
    let factory = Arc::new(SyntheticAdaptiveFactory::new());
    let shell = PlayerShellBuilder::new(Arc::clone(&surface) as Arc<dyn MediaSurface>)
        .with_source(StreamSource::with_manifest(
            PROGRESSIVE_URL,
            MANIFEST_URL,
            None,
        ))
        .with_probe(Box::new(StaticProbe {
            support: NativeAdaptiveSupport::Maybe,
            apple_media_stack: false,
        }))
        .with_adaptive_factory(Box::new(ForwardingFactory(Arc::clone(&factory))))
        .with_preference_store(Arc::new(MemoryStore::new()))
        .with_tuning(Tuning::default())
        .build()?;

    assert_eq!(shell.delivery_mode(), Some(DeliveryMode::ClientAdaptive));
    assert_eq!(factory.created_count(), 1);

    Ok(())
}

struct ForwardingFactory(Arc<SyntheticAdaptiveFactory>);

impl clipset_player::source::AdaptiveEngineFactory for ForwardingFactory {
    fn create(
        &self,
        decorator: clipset_player::source::RequestDecorator,
    ) -> Box<dyn clipset_player::source::AdaptiveEngine> {
        use clipset_player::source::AdaptiveEngineFactory;
        self.0.create(decorator)
    }
}
